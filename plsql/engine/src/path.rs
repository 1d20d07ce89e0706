use std::fmt;
use std::str::FromStr;

use plsql_common::error::ArgumentError;
use smol_str::SmolStr;

/// A routine reference in one of three forms: `name`, `scope.name`, or
/// `schema.package.name`.
///
/// A single qualifier is ambiguous between a schema and a package; the
/// locator tries both, schema first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutinePath {
    scope: Option<SmolStr>,
    package: Option<SmolStr>,
    name: SmolStr,
}

impl RoutinePath {
    pub fn name(name: impl Into<SmolStr>) -> Self {
        Self {
            scope: None,
            package: None,
            name: name.into(),
        }
    }

    pub fn scoped(scope: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            scope: Some(scope.into()),
            package: None,
            name: name.into(),
        }
    }

    pub fn qualified(
        schema: impl Into<SmolStr>,
        package: impl Into<SmolStr>,
        name: impl Into<SmolStr>,
    ) -> Self {
        Self {
            scope: Some(schema.into()),
            package: Some(package.into()),
            name: name.into(),
        }
    }

    #[inline]
    pub fn scope(&self) -> Option<&SmolStr> {
        self.scope.as_ref()
    }

    #[inline]
    pub fn package(&self) -> Option<&SmolStr> {
        self.package.as_ref()
    }

    #[inline]
    pub fn routine(&self) -> &SmolStr {
        &self.name
    }
}

impl FromStr for RoutinePath {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(ArgumentError::InvalidPath {
                path: s.to_string(),
            });
        }
        match segments.as_slice() {
            [name] => Ok(RoutinePath::name(*name)),
            [scope, name] => Ok(RoutinePath::scoped(*scope, *name)),
            [schema, package, name] => Ok(RoutinePath::qualified(*schema, *package, *name)),
            _ => Err(ArgumentError::InvalidPath {
                path: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RoutinePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            write!(f, "{scope}.")?;
        }
        if let Some(package) = &self.package {
            write!(f, "{package}.")?;
        }
        write!(f, "{}", self.name)
    }
}
