use bigdecimal::{BigDecimal, ToPrimitive};
use plsql_catalog::types::{CollectionType, RecordType, ScalarKind, TypeDescriptor};
use plsql_common::error::ArgumentError;
use plsql_common::value::{RecordValue, Value};

use crate::config::{CodecConfig, EmptyLobBehavior};
use crate::encoded::EncodedValue;
use crate::temporal;

/// Converts host values to call-ready typed values and back, per type
/// descriptor.
///
/// Encoding validates eagerly and fails with [`ArgumentError`] before
/// anything reaches the execution transport. Decoding trusts the transport:
/// a payload that disagrees with its descriptor decodes by its own shape.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encodes one host value against a parameter or field type. NULL, either
    /// [`Value::Null`] or a typed variant holding `None`, encodes to
    /// [`EncodedValue::Null`] for every type.
    pub fn encode(&self, value: &Value, ty: &TypeDescriptor) -> Result<EncodedValue, ArgumentError> {
        self.ensure_callable(ty)?;
        match ty {
            TypeDescriptor::Scalar(kind) => self.encode_scalar(value, *kind),
            TypeDescriptor::Record(record) => self.encode_record(value, record),
            TypeDescriptor::Collection(collection) => self.encode_collection(value, collection),
        }
    }

    /// Decodes a transport value back into a host value.
    pub fn decode(&self, encoded: &EncodedValue, ty: &TypeDescriptor) -> Value {
        match (ty, encoded) {
            (_, EncodedValue::Null) => Value::Null,
            (TypeDescriptor::Scalar(kind), _) => self.decode_scalar(encoded, *kind),
            (TypeDescriptor::Record(record), EncodedValue::Record(values)) => {
                let fields = record
                    .fields()
                    .iter()
                    .enumerate()
                    .map(|(index, field)| {
                        let value = values
                            .get(index)
                            .map(|encoded| self.decode(encoded, field.ty()))
                            .unwrap_or(Value::Null);
                        (field.name().clone(), value)
                    })
                    .collect::<RecordValue>();
                Value::Record(Some(fields))
            }
            (TypeDescriptor::Collection(collection), EncodedValue::Collection(values)) => {
                let items = values
                    .iter()
                    .map(|encoded| self.decode(encoded, collection.element()))
                    .collect();
                Value::Collection(Some(items))
            }
            (_, other) => self.decode_untyped(other),
        }
    }

    /// Record and collection types declared inside a package body cannot be
    /// bound, whatever the supplied value.
    fn ensure_callable(&self, ty: &TypeDescriptor) -> Result<(), ArgumentError> {
        let type_name = match ty {
            TypeDescriptor::Scalar(_) => return Ok(()),
            TypeDescriptor::Record(record) => record.type_name(),
            TypeDescriptor::Collection(collection) => collection.type_name(),
        };
        if ty.is_callable() {
            Ok(())
        } else {
            Err(ArgumentError::PackageLocalType {
                type_name: type_name.clone(),
            })
        }
    }

    fn encode_scalar(
        &self,
        value: &Value,
        kind: ScalarKind,
    ) -> Result<EncodedValue, ArgumentError> {
        if value.is_null() {
            return Ok(EncodedValue::Null);
        }
        match kind {
            ScalarKind::Number => self.encode_number(value),
            ScalarKind::Varchar => match value {
                Value::String(Some(s)) => Ok(EncodedValue::Varchar(s.clone())),
                other => Err(mismatch(other, kind)),
            },
            ScalarKind::Boolean => match value {
                Value::Boolean(Some(b)) => Ok(EncodedValue::Boolean(*b)),
                other => Err(mismatch(other, kind)),
            },
            ScalarKind::Date | ScalarKind::Timestamp => {
                temporal::to_instant(value, self.config.default_timezone, &kind.to_string())
                    .map(EncodedValue::Timestamp)
            }
            ScalarKind::Clob => match value {
                Value::String(Some(s)) => Ok(self.encode_clob(s)),
                other => Err(mismatch(other, kind)),
            },
            ScalarKind::Blob => match value {
                Value::Bytes(Some(bytes)) => Ok(self.encode_blob(bytes)),
                other => Err(mismatch(other, kind)),
            },
        }
    }

    fn encode_number(&self, value: &Value) -> Result<EncodedValue, ArgumentError> {
        match value {
            Value::Integer(Some(i)) => Ok(EncodedValue::Number(BigDecimal::from(*i))),
            Value::Decimal(Some(d)) => Ok(EncodedValue::Number(d.clone())),
            Value::Float(Some(f)) => BigDecimal::try_from(*f)
                .map(EncodedValue::Number)
                .map_err(|_| mismatch(value, ScalarKind::Number)),
            // Booleans degrade to 1/0 for NUMBER parameters.
            Value::Boolean(Some(b)) => Ok(EncodedValue::Number(BigDecimal::from(i64::from(*b)))),
            other => Err(mismatch(other, ScalarKind::Number)),
        }
    }

    fn encode_clob(&self, text: &str) -> EncodedValue {
        if text.is_empty() && self.config.empty_lob == EmptyLobBehavior::NullSubstitution {
            EncodedValue::Null
        } else {
            EncodedValue::Clob(text.to_string())
        }
    }

    fn encode_blob(&self, bytes: &[u8]) -> EncodedValue {
        if bytes.is_empty() && self.config.empty_lob == EmptyLobBehavior::NullSubstitution {
            EncodedValue::Null
        } else {
            EncodedValue::Blob(bytes.to_vec())
        }
    }

    fn encode_record(
        &self,
        value: &Value,
        record: &RecordType,
    ) -> Result<EncodedValue, ArgumentError> {
        let supplied = match value {
            Value::Record(Some(supplied)) => supplied,
            other if other.is_null() => return Ok(EncodedValue::Null),
            other => return Err(mismatch_named(other, record.type_name())),
        };
        for (name, _) in supplied.fields() {
            if record.field(name).is_none() {
                return Err(ArgumentError::UnknownField {
                    type_name: record.type_name().clone(),
                    field: name.clone(),
                });
            }
        }
        let mut fields = Vec::with_capacity(record.fields().len());
        for field in record.fields() {
            let encoded = match supplied.get(field.name()) {
                Some(value) => self.encode(value, field.ty())?,
                None => EncodedValue::Null,
            };
            fields.push(encoded);
        }
        Ok(EncodedValue::Record(fields))
    }

    fn encode_collection(
        &self,
        value: &Value,
        collection: &CollectionType,
    ) -> Result<EncodedValue, ArgumentError> {
        let items = match value {
            Value::Collection(Some(items)) => items,
            other if other.is_null() => return Ok(EncodedValue::Null),
            other => return Err(mismatch_named(other, collection.type_name())),
        };
        items
            .iter()
            .map(|item| self.encode(item, collection.element()))
            .collect::<Result<Vec<_>, _>>()
            .map(EncodedValue::Collection)
    }

    fn decode_scalar(&self, encoded: &EncodedValue, kind: ScalarKind) -> Value {
        match (kind, encoded) {
            (ScalarKind::Number, EncodedValue::Number(d)) => decode_number(d),
            (ScalarKind::Varchar, EncodedValue::Varchar(s)) => Value::String(Some(s.clone())),
            (ScalarKind::Boolean, EncodedValue::Boolean(b)) => Value::Boolean(Some(*b)),
            (ScalarKind::Date | ScalarKind::Timestamp, EncodedValue::Timestamp(ts)) => {
                Value::TimestampTz(Some(temporal::into_session_zone(
                    *ts,
                    self.config.default_timezone,
                )))
            }
            (ScalarKind::Clob, EncodedValue::Clob(s)) => Value::String(Some(s.clone())),
            (ScalarKind::Blob, EncodedValue::Blob(bytes)) => Value::Bytes(Some(bytes.clone())),
            (_, other) => self.decode_untyped(other),
        }
    }

    fn decode_untyped(&self, encoded: &EncodedValue) -> Value {
        match encoded {
            EncodedValue::Null => Value::Null,
            EncodedValue::Number(d) => decode_number(d),
            EncodedValue::Varchar(s) | EncodedValue::Clob(s) => Value::String(Some(s.clone())),
            EncodedValue::Boolean(b) => Value::Boolean(Some(*b)),
            EncodedValue::Timestamp(ts) => Value::TimestampTz(Some(temporal::into_session_zone(
                *ts,
                self.config.default_timezone,
            ))),
            EncodedValue::Blob(bytes) => Value::Bytes(Some(bytes.clone())),
            EncodedValue::Record(values) | EncodedValue::Collection(values) => Value::Collection(
                Some(values.iter().map(|value| self.decode_untyped(value)).collect()),
            ),
        }
    }
}

/// Non-integral NUMBER results keep arbitrary precision; integral ones (that
/// fit) come back as plain integers.
fn decode_number(d: &BigDecimal) -> Value {
    if d.is_integer() {
        if let Some(i) = d.to_i64() {
            return Value::Integer(Some(i));
        }
    }
    Value::Decimal(Some(d.clone()))
}

fn mismatch(value: &Value, kind: ScalarKind) -> ArgumentError {
    ArgumentError::TypeMismatch {
        value_kind: value.kind_name(),
        target: kind.to_string(),
    }
}

fn mismatch_named(value: &Value, type_name: &str) -> ArgumentError {
    ArgumentError::TypeMismatch {
        value_kind: value.kind_name(),
        target: type_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use plsql_catalog::types::{CollectionType, RecordField, RecordType};

    use super::*;
    use crate::config::TimeZoneMode;

    fn utc_codec() -> Codec {
        Codec::new(CodecConfig::new(
            TimeZoneMode::Utc,
            EmptyLobBehavior::NullSubstitution,
        ))
    }

    fn number() -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::Number)
    }

    fn employee_record() -> RecordType {
        RecordType::new(
            "test_employees%rowtype",
            vec![
                RecordField::new("employee_id", ScalarKind::Number.into()),
                RecordField::new("first_name", ScalarKind::Varchar.into()),
                RecordField::new("last_name", ScalarKind::Varchar.into()),
                RecordField::new("hire_date", ScalarKind::Date.into()),
            ],
            false,
        )
    }

    #[test]
    fn test_null_encodes_to_null_for_every_kind() {
        let codec = utc_codec();
        for ty in [
            number(),
            TypeDescriptor::Scalar(ScalarKind::Varchar),
            TypeDescriptor::Scalar(ScalarKind::Boolean),
            TypeDescriptor::Scalar(ScalarKind::Clob),
            TypeDescriptor::Record(employee_record()),
        ] {
            assert_eq!(codec.encode(&Value::Null, &ty).unwrap(), EncodedValue::Null);
        }
        assert_eq!(
            codec.encode(&Value::String(None), &number()).unwrap(),
            EncodedValue::Null
        );
    }

    #[test]
    fn test_number_round_trip() {
        let codec = utc_codec();
        let encoded = codec.encode(&Value::from(579i64), &number()).unwrap();
        assert_eq!(codec.decode(&encoded, &number()), Value::from(579i64));

        let big: BigDecimal = "579.579".parse().unwrap();
        let encoded = codec.encode(&Value::from(big.clone()), &number()).unwrap();
        assert_eq!(codec.decode(&encoded, &number()), Value::from(big));
    }

    #[test]
    fn test_integral_decimal_decodes_to_integer() {
        let codec = utc_codec();
        let whole: BigDecimal = "579.000".parse().unwrap();
        assert_eq!(
            codec.decode(&EncodedValue::Number(whole), &number()),
            Value::from(579i64)
        );
    }

    #[test]
    fn test_float_encodes_as_decimal() {
        let codec = utc_codec();
        let encoded = codec.encode(&Value::from(123.5f64), &number()).unwrap();
        assert_eq!(encoded, EncodedValue::Number("123.5".parse().unwrap()));
    }

    #[test]
    fn test_boolean_coerces_for_number_parameters() {
        let codec = utc_codec();
        assert_eq!(
            codec.encode(&Value::from(true), &number()).unwrap(),
            EncodedValue::Number(BigDecimal::from(1))
        );
        assert_eq!(
            codec.encode(&Value::from(false), &number()).unwrap(),
            EncodedValue::Number(BigDecimal::from(0))
        );
    }

    #[test]
    fn test_boolean_round_trip() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Scalar(ScalarKind::Boolean);
        for b in [true, false] {
            let encoded = codec.encode(&Value::from(b), &ty).unwrap();
            assert_eq!(codec.decode(&encoded, &ty), Value::from(b));
        }
    }

    #[test]
    fn test_varchar_round_trip() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Scalar(ScalarKind::Varchar);
        let encoded = codec.encode(&Value::from("xxx"), &ty).unwrap();
        assert_eq!(codec.decode(&encoded, &ty), Value::from("xxx"));
    }

    #[test]
    fn test_varchar_rejects_other_kinds() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Scalar(ScalarKind::Varchar);
        let result = codec.encode(&Value::from(1i64), &ty);
        assert!(matches!(result, Err(ArgumentError::TypeMismatch { .. })));
    }

    #[test]
    fn test_temporal_round_trip_normalizes_to_session_zone() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Scalar(ScalarKind::Date);
        let naive = NaiveDate::from_ymd_opt(2008, 8, 12)
            .unwrap()
            .and_hms_opt(14, 28, 0)
            .unwrap();
        let encoded = codec.encode(&Value::from(naive), &ty).unwrap();
        let expected = Utc.from_utc_datetime(&naive).fixed_offset();
        assert_eq!(codec.decode(&encoded, &ty), Value::from(expected));
    }

    #[test]
    fn test_local_mode_round_trip_keeps_the_instant() {
        let codec = Codec::new(CodecConfig::new(
            TimeZoneMode::Local,
            EmptyLobBehavior::NullSubstitution,
        ));
        let ty = TypeDescriptor::Scalar(ScalarKind::Timestamp);
        let naive = NaiveDate::from_ymd_opt(2008, 8, 12)
            .unwrap()
            .and_hms_opt(14, 28, 0)
            .unwrap();
        let encoded = codec.encode(&Value::from(naive), &ty).unwrap();
        let EncodedValue::Timestamp(instant) = encoded.clone() else {
            panic!("expected timestamp");
        };
        // Whatever the host timezone, decoding keeps the instant.
        assert_eq!(codec.decode(&encoded, &ty), Value::from(instant));
    }

    #[test]
    fn test_date_only_input_becomes_midnight() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Scalar(ScalarKind::Date);
        let date = NaiveDate::from_ymd_opt(2008, 8, 12).unwrap();
        let encoded = codec.encode(&Value::from(date), &ty).unwrap();
        let expected = Utc
            .from_utc_datetime(&date.and_time(NaiveTime::MIN))
            .fixed_offset();
        assert_eq!(codec.decode(&encoded, &ty), Value::from(expected));
    }

    #[test]
    fn test_empty_clob_substitutes_null_by_default() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Scalar(ScalarKind::Clob);
        assert_eq!(
            codec.encode(&Value::from(""), &ty).unwrap(),
            EncodedValue::Null
        );
    }

    #[test]
    fn test_empty_clob_preserved_when_configured() {
        let codec = Codec::new(CodecConfig::new(
            TimeZoneMode::Utc,
            EmptyLobBehavior::Preserve,
        ));
        let ty = TypeDescriptor::Scalar(ScalarKind::Clob);
        assert_eq!(
            codec.encode(&Value::from(""), &ty).unwrap(),
            EncodedValue::Clob(String::new())
        );
    }

    #[test]
    fn test_large_clob_round_trip() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Scalar(ScalarKind::Clob);
        let large_text = "ābčdēfghij".repeat(10_000);
        let encoded = codec.encode(&Value::from(large_text.as_str()), &ty).unwrap();
        assert_eq!(codec.decode(&encoded, &ty), Value::from(large_text.as_str()));
    }

    #[test]
    fn test_empty_blob_substitutes_null_by_default() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Scalar(ScalarKind::Blob);
        assert_eq!(
            codec.encode(&Value::from(Vec::<u8>::new()), &ty).unwrap(),
            EncodedValue::Null
        );
    }

    #[test]
    fn test_record_round_trip() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Record(employee_record());
        let hired = Utc
            .with_ymd_and_hms(2000, 1, 31, 0, 0, 0)
            .unwrap()
            .fixed_offset();
        let employee = RecordValue::new()
            .with_field("employee_id", 1i64)
            .with_field("first_name", "First")
            .with_field("last_name", "Last")
            .with_field("hire_date", hired);
        let encoded = codec.encode(&Value::from(employee.clone()), &ty).unwrap();
        assert_eq!(codec.decode(&encoded, &ty), Value::from(employee));
    }

    #[test]
    fn test_record_accepts_mixed_case_keys() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Record(employee_record());
        let employee = RecordValue::new()
            .with_field("EMPLOYEE_ID", 1i64)
            .with_field("first_NAME", "Second");
        let encoded = codec.encode(&Value::from(employee), &ty).unwrap();
        let EncodedValue::Record(fields) = encoded else {
            panic!("expected record");
        };
        assert_eq!(fields[0], EncodedValue::Number(BigDecimal::from(1)));
        assert_eq!(fields[1], EncodedValue::Varchar("Second".to_string()));
        // Unsupplied fields bind as NULL.
        assert_eq!(fields[2], EncodedValue::Null);
        assert_eq!(fields[3], EncodedValue::Null);
    }

    #[test]
    fn test_record_rejects_unknown_field() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Record(employee_record());
        let employee = RecordValue::new().with_field("xxx", "xxx");
        let result = codec.encode(&Value::from(employee), &ty);
        assert!(matches!(
            result,
            Err(ArgumentError::UnknownField { field, .. }) if field == "xxx"
        ));
    }

    #[test]
    fn test_collection_round_trip_is_dense() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Collection(CollectionType::new(
            "t_numbers",
            ScalarKind::Number.into(),
            false,
            false,
        ));
        let numbers = Value::Collection(Some(
            [1i64, 2, 3, 4].into_iter().map(Value::from).collect(),
        ));
        let encoded = codec.encode(&numbers, &ty).unwrap();
        assert_eq!(codec.decode(&encoded, &ty), numbers);
    }

    #[test]
    fn test_package_local_collection_fails_to_bind() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Collection(CollectionType::new(
            "test_collections.t_numbers",
            ScalarKind::Number.into(),
            false,
            true,
        ));
        let numbers = Value::Collection(Some(vec![Value::from(1i64)]));
        let result = codec.encode(&numbers, &ty);
        assert!(matches!(
            result,
            Err(ArgumentError::PackageLocalType { type_name })
                if type_name == "test_collections.t_numbers"
        ));
    }

    #[test]
    fn test_package_local_record_fails_even_for_null() {
        let codec = utc_codec();
        let ty = TypeDescriptor::Record(RecordType::new("pkg_rec", vec![], true));
        let result = codec.encode(&Value::Null, &ty);
        assert!(matches!(result, Err(ArgumentError::PackageLocalType { .. })));
    }
}
