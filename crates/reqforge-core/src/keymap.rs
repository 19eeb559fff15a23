//! Per-run issue key mapping

use std::collections::HashMap;

/// Mapping from record external ids to tracker-assigned issue keys.
///
/// Owned by the scheduler for the duration of one import run: populated
/// monotonically during Phase 1 and read back during Phase 2 parent lookups.
/// Nothing persists across runs; re-importing the same bundle starts from
/// an empty context and creates a fresh set of remote issues.
#[derive(Debug, Default)]
pub struct RunContext {
    keys: HashMap<String, String>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the remote key assigned to a created record.
    pub fn insert(&mut self, external_id: impl Into<String>, remote_key: impl Into<String>) {
        self.keys.insert(external_id.into(), remote_key.into());
    }

    /// Remote key for a record, if it has been created in this run.
    pub fn get(&self, external_id: &str) -> Option<&str> {
        self.keys.get(external_id).map(String::as_str)
    }

    pub fn contains(&self, external_id: &str) -> bool {
        self.keys.contains_key(external_id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
