use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::types::TypeDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterDirection {
    In,
    Out,
    InOut,
}

impl ParameterDirection {
    #[inline]
    pub fn is_input(&self) -> bool {
        matches!(self, ParameterDirection::In | ParameterDirection::InOut)
    }

    /// True if the routine writes this parameter back to the caller.
    #[inline]
    pub fn is_output(&self) -> bool {
        matches!(self, ParameterDirection::Out | ParameterDirection::InOut)
    }
}

impl fmt::Display for ParameterDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterDirection::In => write!(f, "IN"),
            ParameterDirection::Out => write!(f, "OUT"),
            ParameterDirection::InOut => write!(f, "IN OUT"),
        }
    }
}

/// One declared parameter of a routine signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    name: SmolStr,
    ty: TypeDescriptor,
    direction: ParameterDirection,
    has_default: bool,
    position: usize,
}

impl ParameterSpec {
    /// Creates an IN/OUT/IN OUT parameter without a default. The position is
    /// assigned when the spec is attached to a [`RoutineSignature`].
    pub fn new(
        name: impl Into<SmolStr>,
        ty: TypeDescriptor,
        direction: ParameterDirection,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            direction,
            has_default: false,
            position: 0,
        }
    }

    /// Marks the parameter as carrying a declared default value.
    #[inline]
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    #[inline]
    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    #[inline]
    pub fn direction(&self) -> ParameterDirection {
        self.direction
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.has_default
    }

    /// Zero-based declaration position within the owning signature.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The introspected signature of one stored routine, immutable once loaded
/// from the catalog.
///
/// Several signatures may share one name within a scope; such a set forms an
/// overload group distinguished only by parameter counts and names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineSignature {
    schema: Option<SmolStr>,
    package: Option<SmolStr>,
    name: SmolStr,
    parameters: SmallVec<[ParameterSpec; 4]>,
    return_type: Option<TypeDescriptor>,
}

impl RoutineSignature {
    pub fn new(
        name: impl Into<SmolStr>,
        parameters: impl IntoIterator<Item = ParameterSpec>,
        return_type: Option<TypeDescriptor>,
    ) -> Self {
        let parameters = parameters
            .into_iter()
            .enumerate()
            .map(|(position, mut spec)| {
                spec.position = position;
                spec
            })
            .collect();
        Self {
            schema: None,
            package: None,
            name: name.into(),
            parameters,
            return_type,
        }
    }

    /// Attaches the owning schema (and package, for package members).
    pub fn owned_by(mut self, schema: impl Into<SmolStr>, package: Option<SmolStr>) -> Self {
        self.schema = Some(schema.into());
        self.package = package;
        self
    }

    /// Attaches the owning package, keeping any schema already set.
    pub fn owned_by_package(mut self, package: impl Into<SmolStr>) -> Self {
        self.package = Some(package.into());
        self
    }

    #[inline]
    pub fn schema(&self) -> Option<&SmolStr> {
        self.schema.as_ref()
    }

    #[inline]
    pub fn package(&self) -> Option<&SmolStr> {
        self.package.as_ref()
    }

    #[inline]
    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    /// `schema.package.name` with the qualifiers that are present.
    pub fn qualified_name(&self) -> String {
        let mut out = String::new();
        if let Some(schema) = &self.schema {
            out.push_str(schema);
            out.push('.');
        }
        if let Some(package) = &self.package {
            out.push_str(package);
            out.push('.');
        }
        out.push_str(&self.name);
        out
    }

    #[inline]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Case-insensitive parameter lookup.
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
    }

    #[inline]
    pub fn return_type(&self) -> Option<&TypeDescriptor> {
        self.return_type.as_ref()
    }

    /// Functions have a return type; procedures do not.
    #[inline]
    pub fn is_function(&self) -> bool {
        self.return_type.is_some()
    }

    /// Number of parameters that must be supplied positionally, i.e. those
    /// without a declared default.
    pub fn required_parameter_count(&self) -> usize {
        self.parameters
            .iter()
            .filter(|spec| !spec.has_default())
            .count()
    }

    pub fn output_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters
            .iter()
            .filter(|spec| spec.direction().is_output())
    }

    pub fn has_output_parameters(&self) -> bool {
        self.output_parameters().next().is_some()
    }
}
