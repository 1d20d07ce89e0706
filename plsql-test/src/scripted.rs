use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::RwLock;

use plsql_codec::EncodedValue;
use plsql_engine::transport::{
    BoundCall, BoundValue, ExecutionOutput, ExecutionTransport, TransportError,
};

pub type RoutineScript =
    Box<dyn Fn(&BoundCall<'_>) -> Result<ExecutionOutput, TransportError> + Send + Sync>;

/// Stands in for the database in tests: each routine body is a closure over
/// the bound call, keyed by the routine's qualified name.
#[derive(Default)]
pub struct ScriptedTransport {
    routines: RwLock<HashMap<String, RoutineScript>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the body for `qualified_name` (e.g. `hr.test_uppercase` or
    /// `hr.test_package2.test_procedure`). Overloads share one body; scripts
    /// branch on the bound signature where it matters.
    pub fn register<F>(&self, qualified_name: &str, script: F)
    where
        F: Fn(&BoundCall<'_>) -> Result<ExecutionOutput, TransportError> + Send + Sync + 'static,
    {
        self.routines
            .write()
            .expect("the write lock should be acquired successfully")
            .insert(qualified_name.to_uppercase(), Box::new(script));
    }
}

impl Debug for ScriptedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .routines
            .read()
            .expect("the read lock should be acquired successfully")
            .len();
        f.debug_struct("ScriptedTransport")
            .field("routines", &count)
            .finish()
    }
}

impl ExecutionTransport for ScriptedTransport {
    fn execute(&self, call: &BoundCall<'_>) -> Result<ExecutionOutput, TransportError> {
        let key = call.signature().qualified_name().to_uppercase();
        let routines = self
            .routines
            .read()
            .expect("the read lock should be acquired successfully");
        let script = routines.get(&key).ok_or_else(|| {
            TransportError::with_code(6550, format!("PLS-00201: identifier '{key}' must be declared"))
        })?;
        script(call)
    }
}

/// The encoded value bound to `name`, with the NULL placeholder for
/// unsupplied slots. Panics on unknown names or defaulted slots; scripts
/// know their own signatures.
pub fn argument<'c>(call: &'c BoundCall<'_>, name: &str) -> &'c EncodedValue {
    match call
        .parameter(name)
        .unwrap_or_else(|| panic!("parameter {name} is not bound"))
        .value()
    {
        BoundValue::Value(value) => value,
        BoundValue::Default => panic!("parameter {name} took its declared default"),
    }
}

/// Like [`argument`], but resolves a defaulted slot to the given fallback,
/// the way the routine body would evaluate its default expression.
pub fn argument_or<'c>(
    call: &'c BoundCall<'_>,
    name: &str,
    default: &'c EncodedValue,
) -> &'c EncodedValue {
    match call
        .parameter(name)
        .unwrap_or_else(|| panic!("parameter {name} is not bound"))
        .value()
    {
        BoundValue::Value(value) => value,
        BoundValue::Default => default,
    }
}
