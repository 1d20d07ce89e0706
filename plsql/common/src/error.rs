use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised while matching and binding call arguments, before anything
/// reaches the execution transport.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ArgumentError {
    #[error("wrong number of arguments (given {given}, expected {expected})")]
    WrongArgumentCount { given: usize, expected: usize },

    #[error("wrong number of arguments for {routine} (no matching overload)")]
    NoMatchingOverload { routine: SmolStr },

    #[error("arguments match more than one overload of {routine}")]
    AmbiguousOverload { routine: SmolStr },

    #[error("unknown argument {name} for {routine}")]
    UnknownArgument { routine: SmolStr, name: SmolStr },

    #[error("duplicate argument {name}")]
    DuplicateArgument { name: SmolStr },

    #[error("unknown field {field} for record type {type_name}")]
    UnknownField { type_name: SmolStr, field: SmolStr },

    #[error(
        "type {type_name} is declared inside a package and cannot be used as a parameter type"
    )]
    PackageLocalType { type_name: SmolStr },

    #[error("cannot convert {value_kind} value to {target}")]
    TypeMismatch {
        value_kind: &'static str,
        target: String,
    },

    #[error("timestamp {value} cannot be represented in the session timezone")]
    InvalidTimestamp { value: String },

    #[error("invalid routine path {path:?}")]
    InvalidPath { path: String },
}
