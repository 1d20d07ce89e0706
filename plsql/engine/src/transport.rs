use std::fmt::Debug;
use std::sync::Arc;

use miette::Diagnostic;
use plsql_catalog::signature::{ParameterDirection, RoutineSignature};
use plsql_codec::EncodedValue;
use smol_str::SmolStr;
use thiserror::Error;

pub type TransportRef = Arc<dyn ExecutionTransport>;

/// Executes one bound call against the database.
///
/// The transport receives every declared parameter with an assigned value and
/// returns raw slot values for the return slot and every OUT/IN OUT slot, or
/// the native failure diagnostic. It never sees calls that failed argument
/// matching or binding.
pub trait ExecutionTransport: Debug + Send + Sync {
    fn execute(&self, call: &BoundCall<'_>) -> Result<ExecutionOutput, TransportError>;
}

/// The value assigned to one declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// An encoded host value; NULL placeholders bind as
    /// [`EncodedValue::Null`].
    Value(EncodedValue),
    /// The parameter was not supplied and its declared default applies.
    Default,
}

impl BoundValue {
    #[inline]
    pub fn as_value(&self) -> Option<&EncodedValue> {
        match self {
            BoundValue::Value(value) => Some(value),
            BoundValue::Default => None,
        }
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        matches!(self, BoundValue::Default)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameter {
    name: SmolStr,
    direction: ParameterDirection,
    value: BoundValue,
}

impl BoundParameter {
    pub(crate) fn new(name: SmolStr, direction: ParameterDirection, value: BoundValue) -> Self {
        Self {
            name,
            direction,
            value,
        }
    }

    #[inline]
    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    #[inline]
    pub fn direction(&self) -> ParameterDirection {
        self.direction
    }

    #[inline]
    pub fn value(&self) -> &BoundValue {
        &self.value
    }
}

/// A selected signature paired with exactly one assigned value per declared
/// parameter, in declaration order.
#[derive(Debug)]
pub struct BoundCall<'a> {
    signature: &'a RoutineSignature,
    parameters: Vec<BoundParameter>,
}

impl<'a> BoundCall<'a> {
    pub(crate) fn new(signature: &'a RoutineSignature, parameters: Vec<BoundParameter>) -> Self {
        debug_assert_eq!(signature.parameters().len(), parameters.len());
        Self {
            signature,
            parameters,
        }
    }

    #[inline]
    pub fn signature(&self) -> &RoutineSignature {
        self.signature
    }

    #[inline]
    pub fn parameters(&self) -> &[BoundParameter] {
        &self.parameters
    }

    /// Case-insensitive parameter lookup.
    pub fn parameter(&self, name: &str) -> Option<&BoundParameter> {
        self.parameters
            .iter()
            .find(|parameter| parameter.name.eq_ignore_ascii_case(name))
    }
}

/// Raw per-protocol values returned by the transport for one call.
///
/// `out_values` aligns with the signature's OUT/IN OUT parameters in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionOutput {
    return_value: Option<EncodedValue>,
    out_values: Vec<EncodedValue>,
}

impl ExecutionOutput {
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn returning(value: EncodedValue) -> Self {
        Self {
            return_value: Some(value),
            out_values: Vec::new(),
        }
    }

    pub fn with_out_values(mut self, values: impl IntoIterator<Item = EncodedValue>) -> Self {
        self.out_values = values.into_iter().collect();
        self
    }

    #[inline]
    pub fn return_value(&self) -> Option<&EncodedValue> {
        self.return_value.as_ref()
    }

    #[inline]
    pub fn out_values(&self) -> &[EncodedValue] {
        &self.out_values
    }
}

/// A transport-level failure carrying the native diagnostic, e.g.
/// `ORA-06550`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{message}")]
pub struct TransportError {
    code: Option<u32>,
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: u32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    #[inline]
    pub fn code(&self) -> Option<u32> {
        self.code
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}
