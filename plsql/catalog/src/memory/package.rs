use std::collections::HashMap;
use std::sync::RwLock;

use smol_str::SmolStr;

use crate::error::CatalogResult;
use crate::provider::{PackageProvider, RoutineSet};
use crate::signature::RoutineSignature;

#[derive(Debug)]
pub struct MemoryPackageCatalog {
    name: SmolStr,
    members: RwLock<HashMap<String, Vec<RoutineSignature>>>,
}

impl MemoryPackageCatalog {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            members: RwLock::new(HashMap::new()),
        }
    }

    /// Adds one overload to the member's overload group, tagging it with this
    /// package as owner.
    pub fn add_member(&self, signature: RoutineSignature) {
        let key = signature.name().to_uppercase();
        let signature = signature.owned_by_package(self.name.clone());
        self.members
            .write()
            .expect("the write lock should be acquired successfully")
            .entry(key)
            .or_default()
            .push(signature);
    }
}

impl PackageProvider for MemoryPackageCatalog {
    #[inline]
    fn name(&self) -> &SmolStr {
        &self.name
    }

    #[inline]
    fn get_member(&self, name: &str) -> CatalogResult<Option<RoutineSet>> {
        Ok(self
            .members
            .read()
            .expect("the read lock should be acquired successfully")
            .get(&name.to_uppercase())
            .map(|overloads| overloads.clone().into()))
    }
}
