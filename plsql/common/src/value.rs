use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use pastey::paste;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

pub type Nullable<T> = Option<T>;

/// A host-side value passed to or returned from a stored routine.
///
/// NULL is representable both as [`Value::Null`] and as a typed variant with a
/// `None` payload; the two are treated identically by the marshaling layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(Nullable<bool>),
    Integer(Nullable<i64>),
    Decimal(Nullable<BigDecimal>),
    Float(Nullable<f64>),
    String(Nullable<String>),
    Date(Nullable<NaiveDate>),
    Timestamp(Nullable<NaiveDateTime>),
    TimestampTz(Nullable<DateTime<FixedOffset>>),
    Bytes(Nullable<Vec<u8>>),
    Record(Nullable<RecordValue>),
    Collection(Nullable<Vec<Value>>),
}

impl Value {
    /// Returns true if `self` carries no payload, either as [`Value::Null`] or
    /// as a typed variant holding `None`.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Integer(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Float(v) => v.is_none(),
            Value::String(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::TimestampTz(v) => v.is_none(),
            Value::Bytes(v) => v.is_none(),
            Value::Record(v) => v.is_none(),
            Value::Collection(v) => v.is_none(),
        }
    }

    /// A short name for the variant, used in conversion error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamp with time zone",
            Value::Bytes(_) => "bytes",
            Value::Record(_) => "record",
            Value::Collection(_) => "collection",
        }
    }
}

macro_rules! for_each_non_null_variant {
    ($m:ident) => {
        $m!(boolean, bool, Boolean);
        $m!(integer, i64, Integer);
        $m!(decimal, BigDecimal, Decimal);
        $m!(float, f64, Float);
        $m!(string, String, String);
        $m!(date, NaiveDate, Date);
        $m!(timestamp, NaiveDateTime, Timestamp);
        $m!(timestamp_tz, DateTime<FixedOffset>, TimestampTz);
        $m!(bytes, Vec<u8>, Bytes);
        $m!(record, RecordValue, Record);
        $m!(collection, Vec<Value>, Collection);
    };
}

macro_rules! impl_from_for_variant {
    ($_:ident, $ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Value::$variant(Some(value))
            }
        }
    };
}

for_each_non_null_variant!(impl_from_for_variant);

macro_rules! impl_from_nullable_for_variant {
    ($_:ident, $ty:ty, $variant:ident) => {
        impl From<Nullable<$ty>> for Value {
            #[inline]
            fn from(value: Nullable<$ty>) -> Self {
                Value::$variant(value)
            }
        }
    };
}

for_each_non_null_variant!(impl_from_nullable_for_variant);

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(Some(value.to_string()))
    }
}

impl From<Nullable<&str>> for Value {
    #[inline]
    fn from(value: Nullable<&str>) -> Self {
        Value::String(value.map(String::from))
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(value: i32) -> Self {
        Value::Integer(Some(value.into()))
    }
}

macro_rules! impl_as_for_variant {
    ($name:ident, $ty:ty, $variant:ident) => {
        impl Value {
            paste! {
                #[doc = concat!(" Attempts to downcast `self` to borrowed `Nullable<", stringify!($ty), ">`, returning `None` if not possible.")]
                #[inline]
                pub fn [<try_as_ $name>](&self) -> Option<&Nullable<$ty>> {
                    match self {
                        Value::$variant(value) => Some(value),
                        _ => None
                    }
                }
            }
        }
    };
}

for_each_non_null_variant!(impl_as_for_variant);

macro_rules! impl_into_for_variant {
    ($name:ident, $ty:ty, $variant:ident) => {
        impl Value {
            paste! {
                #[doc = concat!(" Attempts to downcast `self` to owned `Nullable<", stringify!($ty), ">`, returning `None` if not possible.")]
                #[inline]
                pub fn [<into_ $name>](self) -> Option<Nullable<$ty>> {
                    match self {
                        Value::$variant(value) => Some(value),
                        _ => None
                    }
                }
            }
        }
    };
}

for_each_non_null_variant!(impl_into_for_variant);

/// An ordered field-name → value mapping used for record parameters and
/// record results.
///
/// Field lookup is case-insensitive; insertion order is preserved. Inserting a
/// field whose name matches an existing one (ignoring case) replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordValue(Vec<(SmolStr, Value)>);

impl RecordValue {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<SmolStr>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self
            .0
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    /// Builder-style [`RecordValue::insert`].
    #[inline]
    pub fn with_field(mut self, name: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    #[inline]
    pub fn fields(&self) -> impl Iterator<Item = (&SmolStr, &Value)> {
        self.0.iter().map(|(name, value)| (name, value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<SmolStr>, V: Into<Value>> FromIterator<(N, V)> for RecordValue {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut record = RecordValue::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(42i64), Value::Integer(Some(42)));
        assert_eq!(Value::from("abc"), Value::String(Some("abc".to_string())));
        assert_eq!(Value::from(true), Value::Boolean(Some(true)));
        assert_eq!(Value::from(None::<i64>), Value::Integer(None));
    }

    #[test]
    fn test_is_null() {
        assert!(Value::Null.is_null());
        assert!(Value::String(None).is_null());
        assert!(!Value::String(Some(String::new())).is_null());
        assert!(!Value::Boolean(Some(false)).is_null());
    }

    #[test]
    fn test_try_as_downcast() {
        let value = Value::from(123i64);
        assert_eq!(value.try_as_integer(), Some(&Some(123)));
        assert_eq!(value.try_as_string(), None);
    }

    #[test]
    fn test_record_case_insensitive_lookup() {
        let record = RecordValue::new()
            .with_field("first_name", "First")
            .with_field("LAST_NAME", "Last");
        assert_eq!(record.get("FIRST_NAME"), Some(&Value::from("First")));
        assert_eq!(record.get("last_name"), Some(&Value::from("Last")));
        assert_eq!(record.get("hire_date"), None);
    }

    #[test]
    fn test_record_insert_replaces_ignoring_case() {
        let mut record = RecordValue::new();
        record.insert("name", "first");
        record.insert("NAME", "second");
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("name"), Some(&Value::from("second")));
    }
}
