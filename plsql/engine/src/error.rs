use miette::Diagnostic;
use plsql_catalog::error::CatalogError;
use plsql_common::error::ArgumentError;
use thiserror::Error;

use crate::transport::TransportError;

/// The call itself failed, in the database or in the transport. The native
/// diagnostic is carried through unmodified and never retried.
#[derive(Debug, Error, Diagnostic)]
#[error(transparent)]
pub struct ExecutionError(#[from] TransportError);

impl ExecutionError {
    /// The native diagnostic as reported by the transport.
    #[inline]
    pub fn diagnostic(&self) -> &TransportError {
        &self.0
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Execution(#[from] ExecutionError),

    #[error("catalog error")]
    Catalog(#[from] CatalogError),
}

impl From<TransportError> for Error {
    fn from(error: TransportError) -> Self {
        Error::Execution(ExecutionError::from(error))
    }
}

pub type EngineResult<T> = std::result::Result<T, Error>;
