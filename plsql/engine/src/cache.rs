use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use plsql_catalog::provider::RoutineSet;
use smol_str::SmolStr;

use crate::error::EngineResult;

/// Cache key: normalized (scope, package, name). Empty segments stand for
/// absent qualifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    scope: SmolStr,
    package: SmolStr,
    name: SmolStr,
}

impl CacheKey {
    pub(crate) fn new(scope: Option<&str>, package: Option<&str>, name: &str) -> Self {
        Self {
            scope: normalize(scope.unwrap_or_default()),
            package: normalize(package.unwrap_or_default()),
            name: normalize(name),
        }
    }
}

fn normalize(segment: &str) -> SmolStr {
    SmolStr::new(segment.to_uppercase())
}

/// Session-scoped cache of resolved overload sets.
///
/// Reads are lock-free for present keys. Population goes through the map's
/// entry lock, so at most one caller resolves a given key at a time and
/// concurrent callers for that key wait for the winner's result. Misses are
/// not cached: a routine created after a failed lookup is found on the next
/// call without an invalidation.
#[derive(Debug, Default)]
pub(crate) struct SignatureCache {
    entries: DashMap<CacheKey, RoutineSet>,
}

impl SignatureCache {
    pub(crate) fn get_or_try_populate<F>(
        &self,
        key: CacheKey,
        populate: F,
    ) -> EngineResult<Option<RoutineSet>>
    where
        F: FnOnce() -> EngineResult<Option<RoutineSet>>,
    {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => Ok(Some(entry.get().clone())),
            Entry::Vacant(entry) => match populate()? {
                Some(set) => {
                    entry.insert(set.clone());
                    Ok(Some(set))
                }
                None => Ok(None),
            },
        }
    }

    /// Drops every entry. Invalidation is wholesale; entries are never
    /// patched in place.
    pub(crate) fn invalidate(&self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
