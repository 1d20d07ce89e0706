use plsql_catalog::provider::CatalogRef;
use plsql_engine::transport::TransportRef;

use crate::session::{Session, SessionConfig};

/// Owns the shared collaborators (catalog provider and execution transport)
/// and opens sessions against them.
#[derive(Debug)]
pub struct Database {
    catalog: CatalogRef,
    transport: TransportRef,
    config: SessionConfig,
}

impl Database {
    pub fn new(catalog: CatalogRef, transport: TransportRef, config: SessionConfig) -> Self {
        Self {
            catalog,
            transport,
            config,
        }
    }

    /// Opens a session with its own signature cache.
    pub fn session(&self) -> Session {
        Session::new(
            self.catalog.clone(),
            self.transport.clone(),
            self.config.clone(),
        )
    }

    #[inline]
    pub fn catalog(&self) -> &CatalogRef {
        &self.catalog
    }
}
