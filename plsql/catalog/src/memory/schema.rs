use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use smol_str::SmolStr;

use super::package::MemoryPackageCatalog;
use crate::error::CatalogResult;
use crate::provider::{PackageProvider, PackageRef, RoutineSet, SchemaProvider, SynonymTarget};
use crate::signature::RoutineSignature;

#[derive(Debug)]
pub struct MemorySchemaCatalog {
    name: SmolStr,
    routines: RwLock<HashMap<String, Vec<RoutineSignature>>>,
    packages: RwLock<HashMap<String, Arc<MemoryPackageCatalog>>>,
    synonyms: RwLock<HashMap<String, SynonymTarget>>,
}

impl MemorySchemaCatalog {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            routines: RwLock::new(HashMap::new()),
            packages: RwLock::new(HashMap::new()),
            synonyms: RwLock::new(HashMap::new()),
        }
    }

    /// Adds one overload to the routine's overload group, tagging it with
    /// this schema as owner.
    pub fn add_routine(&self, signature: RoutineSignature) {
        let key = signature.name().to_uppercase();
        let signature = signature.owned_by(self.name.clone(), None);
        self.routines
            .write()
            .expect("the write lock should be acquired successfully")
            .entry(key)
            .or_default()
            .push(signature);
    }

    pub fn add_package(&self, package: Arc<MemoryPackageCatalog>) -> bool {
        let key = package.name().to_uppercase();
        self.packages
            .write()
            .expect("the write lock should be acquired successfully")
            .insert(key, package)
            .is_none()
    }

    pub fn add_synonym(&self, name: &str, target: SynonymTarget) -> bool {
        self.synonyms
            .write()
            .expect("the write lock should be acquired successfully")
            .insert(name.to_uppercase(), target)
            .is_none()
    }

    pub fn remove_synonym(&self, name: &str) -> bool {
        self.synonyms
            .write()
            .expect("the write lock should be acquired successfully")
            .remove(&name.to_uppercase())
            .is_some()
    }
}

impl SchemaProvider for MemorySchemaCatalog {
    #[inline]
    fn name(&self) -> &SmolStr {
        &self.name
    }

    #[inline]
    fn get_routine(&self, name: &str) -> CatalogResult<Option<RoutineSet>> {
        Ok(self
            .routines
            .read()
            .expect("the read lock should be acquired successfully")
            .get(&name.to_uppercase())
            .map(|overloads| overloads.clone().into()))
    }

    #[inline]
    fn get_package(&self, name: &str) -> CatalogResult<Option<PackageRef>> {
        Ok(self
            .packages
            .read()
            .expect("the read lock should be acquired successfully")
            .get(&name.to_uppercase())
            .map(|package| package.clone() as _))
    }

    #[inline]
    fn get_synonym(&self, name: &str) -> CatalogResult<Option<SynonymTarget>> {
        Ok(self
            .synonyms
            .read()
            .expect("the read lock should be acquired successfully")
            .get(&name.to_uppercase())
            .cloned())
    }
}
