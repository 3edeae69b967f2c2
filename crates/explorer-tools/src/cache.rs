use dashmap::DashSet;

use crate::matcher::normalize;

/// Process-lifetime cache of bare filenames discovered during listings.
///
/// The cache only grows: insertion is idempotent set-add, nothing is ever
/// pruned, and renamed or deleted files linger as stale entries. It is a hint
/// for lookups, never the source of truth: any name it yields must still be
/// resolved against the live filesystem.
#[derive(Debug, Default)]
pub struct FileNameCache {
    names: DashSet<String>,
}

impl FileNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// First cached filename whose normalized form contains the normalized
    /// query as a substring.
    pub fn find_match(&self, query: &str) -> Option<String> {
        let needle = normalize(query);
        self.names
            .iter()
            .find(|name| normalize(name.key()).contains(&needle))
            .map(|name| name.key().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
