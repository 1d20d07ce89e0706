use plsql_catalog::provider::CatalogRef;
use plsql_codec::{Codec, CodecConfig, EmptyLobBehavior, TimeZoneMode};
use plsql_engine::args::CallArguments;
use plsql_engine::locator::Locator;
use plsql_engine::path::RoutinePath;
use plsql_engine::result::CallResult;
use plsql_engine::transport::TransportRef;
use smol_str::SmolStr;

use crate::error::{Error, Result};
use crate::routine::Routine;

/// Read-only session configuration: where unqualified names resolve, how
/// timezone-less date/time inputs are interpreted, and what happens to empty
/// large-object values.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    default_schema: SmolStr,
    default_timezone: TimeZoneMode,
    empty_lob: EmptyLobBehavior,
}

impl SessionConfig {
    pub fn new(default_schema: impl Into<SmolStr>) -> Self {
        Self {
            default_schema: default_schema.into(),
            default_timezone: TimeZoneMode::default(),
            empty_lob: EmptyLobBehavior::default(),
        }
    }

    pub fn with_timezone(mut self, mode: TimeZoneMode) -> Self {
        self.default_timezone = mode;
        self
    }

    pub fn with_empty_lob(mut self, behavior: EmptyLobBehavior) -> Self {
        self.empty_lob = behavior;
        self
    }

    #[inline]
    pub fn default_schema(&self) -> &SmolStr {
        &self.default_schema
    }

    #[inline]
    pub fn default_timezone(&self) -> TimeZoneMode {
        self.default_timezone
    }

    #[inline]
    pub fn empty_lob(&self) -> EmptyLobBehavior {
        self.empty_lob
    }

    pub(crate) fn codec_config(&self) -> CodecConfig {
        CodecConfig::new(self.default_timezone, self.empty_lob)
    }
}

/// One logical database session.
///
/// Calls are synchronous and blocking. The signature cache belongs to the
/// session: it fills on first resolution of each name and is cleared only by
/// [`Session::invalidate_cache`]; there is no automatic staleness detection.
#[derive(Debug)]
pub struct Session {
    pub(crate) locator: Locator,
    pub(crate) codec: Codec,
    pub(crate) transport: TransportRef,
    config: SessionConfig,
}

impl Session {
    pub(crate) fn new(catalog: CatalogRef, transport: TransportRef, config: SessionConfig) -> Self {
        let codec = Codec::new(config.codec_config());
        Self {
            locator: Locator::new(catalog),
            codec,
            transport,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Looks up a routine by path (`name`, `scope.name`, or
    /// `schema.package.name`) without calling it. `Ok(None)` means the
    /// routine does not exist, which is an answer, not an error.
    pub fn routine(&self, path: &str) -> Result<Option<Routine<'_>>> {
        self.routine_at(path.parse()?)
    }

    /// [`Session::routine`] for an already-parsed path.
    pub fn routine_at(&self, path: RoutinePath) -> Result<Option<Routine<'_>>> {
        let signatures = self
            .locator
            .locate(self.config.default_schema.as_str(), &path)?;
        Ok(signatures.map(|signatures| Routine::new(self, path, signatures)))
    }

    /// Resolves and calls in one step, failing when the routine is missing.
    pub fn call(&self, path: &str, args: CallArguments) -> Result<CallResult> {
        match self.routine(path)? {
            Some(routine) => routine.call(&args),
            None => Err(Error::RoutineNotFound(path.to_string())),
        }
    }

    /// Drops every cached signature set, wholesale. Meant for schema-change
    /// events such as a reconnect.
    pub fn invalidate_cache(&self) {
        self.locator.invalidate();
    }
}
