pub mod package;
pub mod schema;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::CatalogResult;
use crate::provider::{CatalogProvider, SchemaProvider, SchemaRef, SynonymTarget};

use self::schema::MemorySchemaCatalog;

/// In-memory catalog used by tests and embedded setups. Object names are
/// stored uppercase, matching data-dictionary conventions, so lookups are
/// case-insensitive.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    schemas: RwLock<HashMap<String, Arc<MemorySchemaCatalog>>>,
    public_synonyms: RwLock<HashMap<String, SynonymTarget>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_schema(&self, schema: Arc<MemorySchemaCatalog>) -> bool {
        let key = schema.name().to_uppercase();
        self.schemas
            .write()
            .expect("the write lock should be acquired successfully")
            .insert(key, schema)
            .is_none()
    }

    pub fn add_public_synonym(&self, name: &str, target: SynonymTarget) -> bool {
        self.public_synonyms
            .write()
            .expect("the write lock should be acquired successfully")
            .insert(name.to_uppercase(), target)
            .is_none()
    }

    pub fn remove_public_synonym(&self, name: &str) -> bool {
        self.public_synonyms
            .write()
            .expect("the write lock should be acquired successfully")
            .remove(&name.to_uppercase())
            .is_some()
    }
}

impl CatalogProvider for MemoryCatalog {
    #[inline]
    fn get_schema(&self, name: &str) -> CatalogResult<Option<SchemaRef>> {
        Ok(self
            .schemas
            .read()
            .expect("the read lock should be acquired successfully")
            .get(&name.to_uppercase())
            .map(|schema| schema.clone() as _))
    }

    #[inline]
    fn get_public_synonym(&self, name: &str) -> CatalogResult<Option<SynonymTarget>> {
        Ok(self
            .public_synonyms
            .read()
            .expect("the read lock should be acquired successfully")
            .get(&name.to_uppercase())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::PackageProvider;
    use crate::signature::RoutineSignature;
    use crate::types::ScalarKind;

    #[test]
    fn test_schema_lookup_is_case_insensitive() {
        let catalog = MemoryCatalog::new();
        catalog.add_schema(Arc::new(MemorySchemaCatalog::new("hr")));
        assert!(catalog.get_schema("HR").unwrap().is_some());
        assert!(catalog.get_schema("hr").unwrap().is_some());
        assert!(catalog.get_schema("scott").unwrap().is_none());
    }

    #[test]
    fn test_routine_overloads_accumulate() {
        let schema = MemorySchemaCatalog::new("hr");
        schema.add_routine(RoutineSignature::new(
            "test_uppercase",
            vec![],
            Some(ScalarKind::Varchar.into()),
        ));
        schema.add_routine(RoutineSignature::new(
            "TEST_UPPERCASE",
            vec![],
            Some(ScalarKind::Varchar.into()),
        ));
        let set = schema.get_routine("Test_Uppercase").unwrap().unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_package_members() {
        let schema = MemorySchemaCatalog::new("hr");
        let package = Arc::new(package::MemoryPackageCatalog::new("test_package2"));
        package.add_member(RoutineSignature::new("test_procedure", vec![], None));
        schema.add_package(package);
        let found = schema.get_package("TEST_PACKAGE2").unwrap().unwrap();
        assert!(found.get_member("test_procedure").unwrap().is_some());
        assert!(found.get_member("missing").unwrap().is_none());
    }

    #[test]
    fn test_synonym_add_and_remove() {
        let catalog = MemoryCatalog::new();
        let target = SynonymTarget::new(Some("hr".into()), "test_uppercase");
        assert!(catalog.add_public_synonym("test_synonym", target.clone()));
        assert_eq!(
            catalog.get_public_synonym("TEST_SYNONYM").unwrap(),
            Some(target)
        );
        assert!(catalog.remove_public_synonym("test_synonym"));
        assert!(catalog.get_public_synonym("test_synonym").unwrap().is_none());
    }
}
