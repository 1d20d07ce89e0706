use plsql_catalog::signature::{ParameterSpec, RoutineSignature};
use plsql_codec::{Codec, EncodedValue};
use plsql_common::error::ArgumentError;
use plsql_common::value::Value;

use crate::args::CallArguments;
use crate::error::{EngineResult, ExecutionError};
use crate::result::{CallResult, OutputValues};
use crate::transport::{BoundCall, BoundParameter, BoundValue, ExecutionTransport};

/// Orchestrates one resolved call: bind the arguments, hand the bound call to
/// the transport, decode the results.
///
/// Argument errors are raised here, before the transport is touched; transport
/// failures pass through with their diagnostic untouched and are never
/// retried. No partial result is ever produced.
#[derive(Debug)]
pub struct Invoker<'a> {
    codec: &'a Codec,
    transport: &'a dyn ExecutionTransport,
}

impl<'a> Invoker<'a> {
    pub fn new(codec: &'a Codec, transport: &'a dyn ExecutionTransport) -> Self {
        Self { codec, transport }
    }

    pub fn invoke(
        &self,
        signature: &RoutineSignature,
        args: &CallArguments,
    ) -> EngineResult<CallResult> {
        let bound = self.bind(signature, args)?;
        let output = self.transport.execute(&bound).map_err(ExecutionError::from)?;
        let outputs: OutputValues = signature
            .output_parameters()
            .zip(output.out_values())
            .map(|(spec, encoded)| {
                (spec.name().clone(), self.codec.decode(encoded, spec.ty()))
            })
            .collect();
        let return_value = signature.return_type().map(|ty| match output.return_value() {
            Some(encoded) => self.codec.decode(encoded, ty),
            None => Value::Null,
        });
        Ok(match (return_value, outputs.is_empty()) {
            (Some(value), true) => CallResult::Value(value),
            (Some(value), false) => CallResult::ValueWithOutput(value, outputs),
            (None, false) => CallResult::Output(outputs),
            (None, true) => CallResult::Unit,
        })
    }

    /// Pairs every declared parameter with exactly one assigned value.
    fn bind<'s>(
        &self,
        signature: &'s RoutineSignature,
        args: &CallArguments,
    ) -> EngineResult<BoundCall<'s>> {
        let parameters = match args {
            CallArguments::Positional(values) => {
                if values.len() > signature.parameters().len() {
                    return Err(ArgumentError::WrongArgumentCount {
                        given: values.len(),
                        expected: signature.parameters().len(),
                    }
                    .into());
                }
                signature
                    .parameters()
                    .iter()
                    .map(|spec| self.bind_parameter(spec, values.get(spec.position())))
                    .collect::<Result<Vec<_>, _>>()?
            }
            CallArguments::Named(pairs) => {
                for (name, _) in pairs {
                    if signature.parameter(name).is_none() {
                        return Err(ArgumentError::UnknownArgument {
                            routine: signature.name().clone(),
                            name: name.clone(),
                        }
                        .into());
                    }
                }
                signature
                    .parameters()
                    .iter()
                    .map(|spec| {
                        let supplied = pairs
                            .iter()
                            .find(|(name, _)| name.eq_ignore_ascii_case(spec.name()))
                            .map(|(_, value)| value);
                        self.bind_parameter(spec, supplied)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(BoundCall::new(signature, parameters))
    }

    fn bind_parameter(
        &self,
        spec: &ParameterSpec,
        supplied: Option<&Value>,
    ) -> Result<BoundParameter, ArgumentError> {
        let value = match supplied {
            Some(value) => BoundValue::Value(self.codec.encode(value, spec.ty())?),
            // Unsupplied output slots always materialize a NULL placeholder;
            // unsupplied inputs fall back to their declared default, then
            // NULL.
            None if spec.direction().is_output() => BoundValue::Value(EncodedValue::Null),
            None if spec.has_default() => BoundValue::Default,
            None => BoundValue::Value(EncodedValue::Null),
        };
        Ok(BoundParameter::new(
            spec.name().clone(),
            spec.direction(),
            value,
        ))
    }
}
