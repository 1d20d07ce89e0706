use plsql_common::error::ArgumentError;
use plsql_common::value::Value;
use smol_str::SmolStr;

/// The arguments of one call: either an ordered positional sequence or a
/// named mapping with case-insensitive unique keys. The two shapes are never
/// mixed within one call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallArguments {
    Positional(Vec<Value>),
    Named(Vec<(SmolStr, Value)>),
}

impl CallArguments {
    #[inline]
    pub fn empty() -> Self {
        CallArguments::Positional(Vec::new())
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        CallArguments::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Builds named arguments, rejecting keys that repeat ignoring case.
    pub fn named<I, N, V>(pairs: I) -> Result<Self, ArgumentError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<SmolStr>,
        V: Into<Value>,
    {
        let mut collected: Vec<(SmolStr, Value)> = Vec::new();
        for (name, value) in pairs {
            let name = name.into();
            if collected
                .iter()
                .any(|(existing, _)| existing.eq_ignore_ascii_case(&name))
            {
                return Err(ArgumentError::DuplicateArgument { name });
            }
            collected.push((name, value.into()));
        }
        Ok(CallArguments::Named(collected))
    }

    pub fn len(&self) -> usize {
        match self {
            CallArguments::Positional(values) => values.len(),
            CallArguments::Named(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_named(&self) -> bool {
        matches!(self, CallArguments::Named(_))
    }
}

impl Default for CallArguments {
    fn default() -> Self {
        Self::empty()
    }
}
