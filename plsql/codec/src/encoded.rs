use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A call-ready value, typed per the parameter's descriptor, as handed to the
/// execution transport and received back from it.
///
/// Record payloads are positional, ordered by the declared fields of the
/// record type; collections are dense and zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncodedValue {
    Null,
    Number(BigDecimal),
    Varchar(String),
    Boolean(bool),
    Timestamp(DateTime<FixedOffset>),
    Clob(String),
    Blob(Vec<u8>),
    Record(Vec<EncodedValue>),
    Collection(Vec<EncodedValue>),
}

impl EncodedValue {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, EncodedValue::Null)
    }
}
