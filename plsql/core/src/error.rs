use miette::Diagnostic;
use plsql_common::error::ArgumentError;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("routine {0} does not exist")]
    RoutineNotFound(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] plsql_engine::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
