use plsql_common::value::Value;
use smol_str::SmolStr;

/// Decoded OUT/IN OUT parameter values, keyed by declared parameter name in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputValues(Vec<(SmolStr, Value)>);

impl OutputValues {
    /// Case-insensitive lookup by parameter name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &Value)> {
        self.0.iter().map(|(name, value)| (name, value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<SmolStr>> FromIterator<(N, Value)> for OutputValues {
    fn from_iter<T: IntoIterator<Item = (N, Value)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}

/// What one call produced. The shape follows the routine: functions carry a
/// return value, and any OUT/IN OUT parameters add the output mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    /// A procedure without output parameters.
    Unit,
    /// A function without output parameters.
    Value(Value),
    /// A procedure with output parameters.
    Output(OutputValues),
    /// A function with output parameters.
    ValueWithOutput(Value, OutputValues),
}

impl CallResult {
    pub fn return_value(&self) -> Option<&Value> {
        match self {
            CallResult::Value(value) | CallResult::ValueWithOutput(value, _) => Some(value),
            _ => None,
        }
    }

    pub fn outputs(&self) -> Option<&OutputValues> {
        match self {
            CallResult::Output(outputs) | CallResult::ValueWithOutput(_, outputs) => Some(outputs),
            _ => None,
        }
    }

    #[inline]
    pub fn is_unit(&self) -> bool {
        matches!(self, CallResult::Unit)
    }
}
