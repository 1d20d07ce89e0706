use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use plsql_common::error::ArgumentError;
use plsql_common::value::Value;

use crate::config::TimeZoneMode;

/// Interprets a date/time host value as a concrete instant. Timezone-less
/// inputs are read in the configured timezone; a date-only input becomes
/// midnight of that day.
pub(crate) fn to_instant(
    value: &Value,
    mode: TimeZoneMode,
    target: &str,
) -> Result<DateTime<FixedOffset>, ArgumentError> {
    match value {
        Value::TimestampTz(Some(ts)) => Ok(*ts),
        Value::Timestamp(Some(naive)) => resolve_naive(*naive, mode),
        Value::Date(Some(date)) => resolve_naive(date.and_time(NaiveTime::MIN), mode),
        other => Err(ArgumentError::TypeMismatch {
            value_kind: other.kind_name(),
            target: target.to_string(),
        }),
    }
}

fn resolve_naive(
    naive: NaiveDateTime,
    mode: TimeZoneMode,
) -> Result<DateTime<FixedOffset>, ArgumentError> {
    match mode {
        TimeZoneMode::Utc => Ok(Utc.from_utc_datetime(&naive).fixed_offset()),
        TimeZoneMode::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|ts| ts.fixed_offset())
            .ok_or_else(|| ArgumentError::InvalidTimestamp {
                value: naive.to_string(),
            }),
    }
}

/// Normalizes a decoded instant into the configured timezone so all results
/// share one representation.
pub(crate) fn into_session_zone(
    ts: DateTime<FixedOffset>,
    mode: TimeZoneMode,
) -> DateTime<FixedOffset> {
    match mode {
        TimeZoneMode::Utc => ts.with_timezone(&Utc).fixed_offset(),
        TimeZoneMode::Local => ts.with_timezone(&Local).fixed_offset(),
    }
}
