use serde::{Deserialize, Serialize};

/// Interpretation of timezone-less date/time inputs, and the timezone all
/// decoded timestamps are normalized into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeZoneMode {
    #[default]
    Local,
    Utc,
}

/// What to do with an empty string or empty byte sequence bound to a CLOB or
/// BLOB parameter.
///
/// Some native drivers cannot bind an empty large object, in which case the
/// value degrades to NULL. Drivers that can keep the distinction preserve the
/// empty value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyLobBehavior {
    #[default]
    NullSubstitution,
    Preserve,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    pub default_timezone: TimeZoneMode,
    pub empty_lob: EmptyLobBehavior,
}

impl CodecConfig {
    pub fn new(default_timezone: TimeZoneMode, empty_lob: EmptyLobBehavior) -> Self {
        Self {
            default_timezone,
            empty_lob,
        }
    }
}
