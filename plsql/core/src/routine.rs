use plsql_catalog::provider::RoutineSet;
use plsql_catalog::signature::RoutineSignature;
use plsql_engine::args::CallArguments;
use plsql_engine::invoker::Invoker;
use plsql_engine::path::RoutinePath;
use plsql_engine::result::CallResult;
use plsql_engine::selector;

use crate::error::Result;
use crate::session::Session;

/// A resolved routine handle: the overload set located for one path, ready to
/// be called with positional or named arguments.
#[derive(Debug)]
pub struct Routine<'a> {
    session: &'a Session,
    path: RoutinePath,
    signatures: RoutineSet,
}

impl<'a> Routine<'a> {
    pub(crate) fn new(session: &'a Session, path: RoutinePath, signatures: RoutineSet) -> Self {
        Self {
            session,
            path,
            signatures,
        }
    }

    #[inline]
    pub fn path(&self) -> &RoutinePath {
        &self.path
    }

    #[inline]
    pub fn signatures(&self) -> &[RoutineSignature] {
        &self.signatures
    }

    /// More than one signature shares this name within its scope.
    #[inline]
    pub fn is_overloaded(&self) -> bool {
        self.signatures.len() > 1
    }

    /// True when every overload is a function (has a return value).
    pub fn is_function(&self) -> bool {
        self.signatures
            .iter()
            .all(|signature| signature.is_function())
    }

    /// Selects the overload matching the argument shape, binds, executes, and
    /// decodes the results.
    pub fn call(&self, args: &CallArguments) -> Result<CallResult> {
        let signature = selector::select(&self.signatures, args)?;
        let invoker = Invoker::new(&self.session.codec, self.session.transport.as_ref());
        Ok(invoker.invoke(signature, args)?)
    }
}
