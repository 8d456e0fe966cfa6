//! Per-object artifact cache.
//!
//! Artifacts are keyed by object identity, created once and never
//! invalidated. Failed compilations store nothing.

use std::sync::Arc;

use avalon_ir::ObjectId;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct ArtifactCache {
    artifacts: FxHashMap<ObjectId, Arc<str>>,
}

impl ArtifactCache {
    pub fn new() -> Self {
        ArtifactCache::default()
    }

    pub fn get(&self, id: ObjectId) -> Option<Arc<str>> {
        self.artifacts.get(&id).cloned()
    }

    /// Store the artifact for `id`. An artifact already stored wins; the
    /// returned text is the one the cache holds.
    pub fn insert(&mut self, id: ObjectId, text: String) -> Arc<str> {
        Arc::clone(self.artifacts.entry(id).or_insert_with(|| Arc::from(text)))
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.artifacts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

#[cfg(test)]
mod tests;
