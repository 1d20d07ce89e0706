use plsql_catalog::provider::{CatalogRef, RoutineSet, SynonymTarget};
use smol_str::SmolStr;

use crate::cache::{CacheKey, SignatureCache};
use crate::error::EngineResult;
use crate::path::RoutinePath;

/// Longest synonym chain followed before resolution gives up; guards against
/// cycles.
const MAX_SYNONYM_HOPS: usize = 16;

/// Resolves routine paths to overload sets, caching resolved sets per
/// normalized path for the lifetime of the owning session.
#[derive(Debug)]
pub struct Locator {
    catalog: CatalogRef,
    cache: SignatureCache,
}

impl Locator {
    pub fn new(catalog: CatalogRef) -> Self {
        Self {
            catalog,
            cache: SignatureCache::default(),
        }
    }

    #[inline]
    pub fn catalog(&self) -> &CatalogRef {
        &self.catalog
    }

    /// Resolves a routine path to its overload set. `Ok(None)` means the
    /// routine does not exist, which is an answer, not a failure.
    ///
    /// Resolution order, first match wins: a routine owned by the explicit
    /// scope (or the default schema when unscoped), then a package member
    /// when the scope names a package in the default schema, then private
    /// synonyms of the default schema, then public synonyms. Synonym chains
    /// collapse transitively.
    pub fn locate(
        &self,
        default_schema: &str,
        path: &RoutinePath,
    ) -> EngineResult<Option<RoutineSet>> {
        let key = CacheKey::new(
            path.scope().map(SmolStr::as_str),
            path.package().map(SmolStr::as_str),
            path.routine(),
        );
        self.cache
            .get_or_try_populate(key, || self.resolve(default_schema, path))
    }

    /// Clears the signature cache wholesale, e.g. after a reconnect.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    fn resolve(
        &self,
        default_schema: &str,
        path: &RoutinePath,
    ) -> EngineResult<Option<RoutineSet>> {
        if let (Some(schema), Some(package)) = (path.scope(), path.package()) {
            return self.package_member(schema, package, path.routine());
        }
        match path.scope() {
            Some(scope) => self.resolve_scoped(default_schema, scope, path.routine()),
            None => self.resolve_unscoped(default_schema, path.routine()),
        }
    }

    fn resolve_scoped(
        &self,
        default_schema: &str,
        scope: &str,
        name: &str,
    ) -> EngineResult<Option<RoutineSet>> {
        // A schema named `scope` owning the routine directly.
        if let Some(schema) = self.catalog.get_schema(scope)? {
            if let Some(set) = schema.get_routine(name)? {
                return Ok(Some(set));
            }
        }
        // A package named `scope` in the default schema.
        if let Some(set) = self.package_member(default_schema, scope, name)? {
            return Ok(Some(set));
        }
        // A synonym named `scope` pointing at a package.
        if let Some((target_schema, object)) = self.follow_synonyms(default_schema, scope)? {
            return self.package_member(&target_schema, &object, name);
        }
        Ok(None)
    }

    fn resolve_unscoped(
        &self,
        default_schema: &str,
        name: &str,
    ) -> EngineResult<Option<RoutineSet>> {
        if let Some(schema) = self.catalog.get_schema(default_schema)? {
            if let Some(set) = schema.get_routine(name)? {
                return Ok(Some(set));
            }
        }
        if let Some((target_schema, object)) = self.follow_synonyms(default_schema, name)? {
            if let Some(schema) = self.catalog.get_schema(&target_schema)? {
                if let Some(set) = schema.get_routine(&object)? {
                    return Ok(Some(set));
                }
            }
        }
        Ok(None)
    }

    fn package_member(
        &self,
        schema_name: &str,
        package_name: &str,
        name: &str,
    ) -> EngineResult<Option<RoutineSet>> {
        if let Some(schema) = self.catalog.get_schema(schema_name)? {
            if let Some(package) = schema.get_package(package_name)? {
                if let Some(set) = package.get_member(name)? {
                    return Ok(Some(set));
                }
            }
        }
        Ok(None)
    }

    /// Follows synonyms transitively, private before public at every hop.
    /// Returns the final (schema, object) pair once no further synonym
    /// matches, `None` when the name is not a synonym at all or the chain
    /// exceeds [`MAX_SYNONYM_HOPS`].
    fn follow_synonyms(
        &self,
        default_schema: &str,
        name: &str,
    ) -> EngineResult<Option<(SmolStr, SmolStr)>> {
        let mut schema: SmolStr = default_schema.into();
        let mut object: SmolStr = name.into();
        let mut followed = false;
        for _ in 0..MAX_SYNONYM_HOPS {
            match self.synonym_target(&schema, &object)? {
                Some(target) => {
                    followed = true;
                    if let Some(next_schema) = target.schema() {
                        schema = next_schema.clone();
                    }
                    object = target.object().clone();
                }
                None => return Ok(followed.then_some((schema, object))),
            }
        }
        Ok(None)
    }

    fn synonym_target(
        &self,
        schema_name: &str,
        name: &str,
    ) -> EngineResult<Option<SynonymTarget>> {
        if let Some(schema) = self.catalog.get_schema(schema_name)? {
            if let Some(target) = schema.get_synonym(name)? {
                return Ok(Some(target));
            }
        }
        Ok(self.catalog.get_public_synonym(name)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use plsql_catalog::memory::MemoryCatalog;
    use plsql_catalog::memory::package::MemoryPackageCatalog;
    use plsql_catalog::memory::schema::MemorySchemaCatalog;
    use plsql_catalog::signature::RoutineSignature;
    use plsql_catalog::types::ScalarKind;

    use super::*;

    fn function(name: &str) -> RoutineSignature {
        RoutineSignature::new(name, vec![], Some(ScalarKind::Varchar.into()))
    }

    fn fixture() -> (Arc<MemoryCatalog>, Arc<MemorySchemaCatalog>) {
        let catalog = Arc::new(MemoryCatalog::new());
        let hr = Arc::new(MemorySchemaCatalog::new("hr"));
        hr.add_routine(function("test_uppercase"));
        let package = Arc::new(MemoryPackageCatalog::new("test_package2"));
        package.add_member(function("test_procedure"));
        hr.add_package(package);
        catalog.add_schema(hr.clone());
        (catalog, hr)
    }

    #[test]
    fn test_finds_routine_in_default_schema() {
        let (catalog, _) = fixture();
        let locator = Locator::new(catalog);
        let set = locator
            .locate("hr", &RoutinePath::name("test_uppercase"))
            .unwrap();
        assert_eq!(set.unwrap().len(), 1);
    }

    #[test]
    fn test_missing_routine_is_none_not_error() {
        let (catalog, _) = fixture();
        let locator = Locator::new(catalog);
        let set = locator
            .locate("hr", &RoutinePath::name("qwerty123456"))
            .unwrap();
        assert!(set.is_none());
    }

    #[test]
    fn test_schema_qualified_lookup() {
        let (catalog, _) = fixture();
        let locator = Locator::new(catalog);
        let set = locator
            .locate("scott", &RoutinePath::scoped("hr", "test_uppercase"))
            .unwrap();
        assert!(set.is_some());
    }

    #[test]
    fn test_package_member_lookup() {
        let (catalog, _) = fixture();
        let locator = Locator::new(catalog);
        let set = locator
            .locate("hr", &RoutinePath::scoped("test_package2", "test_procedure"))
            .unwrap();
        assert!(set.is_some());
        let set = locator
            .locate(
                "hr",
                &RoutinePath::qualified("hr", "test_package2", "test_procedure"),
            )
            .unwrap();
        assert!(set.is_some());
    }

    #[test]
    fn test_owned_routine_is_preferred_over_synonym() {
        use plsql_catalog::provider::SynonymTarget;
        let catalog = Arc::new(MemoryCatalog::new());
        let hr = Arc::new(MemorySchemaCatalog::new("hr"));
        let scott = Arc::new(MemorySchemaCatalog::new("scott"));
        hr.add_routine(function("f"));
        scott.add_routine(function("other"));
        hr.add_synonym("f", SynonymTarget::new(Some("scott".into()), "other"));
        catalog.add_schema(hr);
        catalog.add_schema(scott);
        let locator = Locator::new(catalog);
        let set = locator.locate("hr", &RoutinePath::name("f")).unwrap().unwrap();
        assert_eq!(set[0].schema().map(SmolStr::as_str), Some("hr"));
    }

    #[test]
    fn test_private_synonym_beats_public_after_invalidation() {
        use plsql_catalog::provider::SynonymTarget;
        let catalog = Arc::new(MemoryCatalog::new());
        let hr = Arc::new(MemorySchemaCatalog::new("hr"));
        let apps = Arc::new(MemorySchemaCatalog::new("apps"));
        hr.add_routine(function("private_target"));
        apps.add_routine(function("public_target"));
        catalog.add_schema(hr.clone());
        catalog.add_schema(apps);
        catalog.add_public_synonym(
            "login_user",
            SynonymTarget::new(Some("apps".into()), "public_target"),
        );

        let locator = Locator::new(catalog);
        let path = RoutinePath::name("login_user");
        let set = locator.locate("hr", &path).unwrap().unwrap();
        assert_eq!(set[0].name(), "public_target");

        // A private synonym created later is shadowed by the cached public
        // resolution until the cache is cleared.
        hr.add_synonym(
            "login_user",
            SynonymTarget::new(Some("hr".into()), "private_target"),
        );
        let set = locator.locate("hr", &path).unwrap().unwrap();
        assert_eq!(set[0].name(), "public_target");

        locator.invalidate();
        let set = locator.locate("hr", &path).unwrap().unwrap();
        assert_eq!(set[0].name(), "private_target");
    }

    #[test]
    fn test_synonym_chain_collapses() {
        use plsql_catalog::provider::SynonymTarget;
        let (catalog, hr) = fixture();
        hr.add_synonym("s1", SynonymTarget::new(None, "s2"));
        hr.add_synonym("s2", SynonymTarget::new(Some("hr".into()), "test_uppercase"));
        let locator = Locator::new(catalog);
        let set = locator.locate("hr", &RoutinePath::name("s1")).unwrap();
        assert!(set.is_some());
    }

    #[test]
    fn test_synonym_cycle_resolves_as_not_found() {
        use plsql_catalog::provider::SynonymTarget;
        let (catalog, hr) = fixture();
        hr.add_synonym("s1", SynonymTarget::new(None, "s2"));
        hr.add_synonym("s2", SynonymTarget::new(None, "s1"));
        let locator = Locator::new(catalog);
        let set = locator.locate("hr", &RoutinePath::name("s1")).unwrap();
        assert!(set.is_none());
    }

    #[test]
    fn test_synonym_to_package_supports_member_calls() {
        use plsql_catalog::provider::SynonymTarget;
        let (catalog, hr) = fixture();
        hr.add_synonym(
            "pkg_alias",
            SynonymTarget::new(Some("hr".into()), "test_package2"),
        );
        let locator = Locator::new(catalog);
        let set = locator
            .locate("hr", &RoutinePath::scoped("pkg_alias", "test_procedure"))
            .unwrap();
        assert!(set.is_some());
    }
}
