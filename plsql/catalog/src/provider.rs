use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::CatalogResult;
use crate::signature::RoutineSignature;

pub type CatalogRef = Arc<dyn CatalogProvider>;
pub type SchemaRef = Arc<dyn SchemaProvider>;
pub type PackageRef = Arc<dyn PackageProvider>;

/// All overloads sharing one routine name within a scope, in declaration
/// order.
pub type RoutineSet = Arc<[RoutineSignature]>;

/// The top-level catalog provider, responsible for schema lookup and public
/// synonym resolution.
///
/// All name lookups are case-insensitive; implementations normalize keys.
/// A lookup that finds nothing returns `Ok(None)`; NotFound is an answer,
/// not an error.
pub trait CatalogProvider: Debug + Send + Sync {
    /// Retrieves a schema by its name.
    fn get_schema(&self, name: &str) -> CatalogResult<Option<SchemaRef>>;

    /// Retrieves a public synonym by its name.
    fn get_public_synonym(&self, name: &str) -> CatalogResult<Option<SynonymTarget>>;
}

/// Represents one schema, which owns routines, packages, and private
/// synonyms.
pub trait SchemaProvider: Debug + Send + Sync {
    /// Returns the name of the schema.
    fn name(&self) -> &SmolStr;

    /// Retrieves all overloads of a schema-level routine by its name.
    fn get_routine(&self, name: &str) -> CatalogResult<Option<RoutineSet>>;

    /// Retrieves a package by its name.
    fn get_package(&self, name: &str) -> CatalogResult<Option<PackageRef>>;

    /// Retrieves a private synonym owned by this schema.
    fn get_synonym(&self, name: &str) -> CatalogResult<Option<SynonymTarget>>;
}

/// Represents a package, which owns member routines.
pub trait PackageProvider: Debug + Send + Sync {
    /// Returns the name of the package.
    fn name(&self) -> &SmolStr;

    /// Retrieves all overloads of a package member by its name.
    fn get_member(&self, name: &str) -> CatalogResult<Option<RoutineSet>>;
}

/// The object a synonym points at. Targets may themselves be synonyms;
/// resolution collapses such chains transitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymTarget {
    schema: Option<SmolStr>,
    object: SmolStr,
}

impl SynonymTarget {
    pub fn new(schema: Option<SmolStr>, object: impl Into<SmolStr>) -> Self {
        Self {
            schema,
            object: object.into(),
        }
    }

    /// The schema owning the target object; `None` keeps the resolving
    /// schema.
    #[inline]
    pub fn schema(&self) -> Option<&SmolStr> {
        self.schema.as_ref()
    }

    #[inline]
    pub fn object(&self) -> &SmolStr {
        &self.object
    }
}
