use plsql_catalog::signature::RoutineSignature;
use plsql_common::error::ArgumentError;
use smol_str::SmolStr;

use crate::args::CallArguments;

/// Picks the overload matching the supplied argument shape.
///
/// A lone candidate is returned without inspecting the arguments; arity and
/// name mismatches surface later as binding errors. Overload groups match by
/// shape only: positional arguments by arity window (required count through
/// declared count), named arguments by declared-name superset. The match must
/// be unique.
pub fn select<'a>(
    candidates: &'a [RoutineSignature],
    args: &CallArguments,
) -> Result<&'a RoutineSignature, ArgumentError> {
    debug_assert!(!candidates.is_empty(), "candidate set must not be empty");
    if let [single] = candidates {
        return Ok(single);
    }
    let routine = candidates
        .first()
        .map(|signature| signature.name().clone())
        .unwrap_or_default();
    match args {
        CallArguments::Positional(values) => {
            let supplied = values.len();
            unique(
                candidates.iter().filter(|signature| {
                    signature.required_parameter_count() <= supplied
                        && supplied <= signature.parameters().len()
                }),
                routine,
            )
        }
        CallArguments::Named(pairs) => unique(
            candidates.iter().filter(|signature| {
                pairs
                    .iter()
                    .all(|(name, _)| signature.parameter(name).is_some())
            }),
            routine,
        ),
    }
}

fn unique<'a>(
    mut matches: impl Iterator<Item = &'a RoutineSignature>,
    routine: SmolStr,
) -> Result<&'a RoutineSignature, ArgumentError> {
    match (matches.next(), matches.next()) {
        (Some(signature), None) => Ok(signature),
        (None, _) => Err(ArgumentError::NoMatchingOverload { routine }),
        (Some(_), Some(_)) => Err(ArgumentError::AmbiguousOverload { routine }),
    }
}
