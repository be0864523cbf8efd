//! Per-project run serialization
//!
//! Workspace identity is purely a function of project name, so two
//! concurrent runs for the same project would race on the same directory.
//! Each project name maps to one mutex, held for a run's whole duration.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Registry of named locks, one per project
pub struct ProjectLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the lock handle for a project, creating it on first use
    ///
    /// The caller locks the returned handle; the registry lock itself is
    /// only held for the lookup.
    pub fn handle(&self, project_name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry(project_name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for ProjectLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_project_shares_a_lock() {
        let locks = ProjectLocks::new();
        let a = locks.handle("app");
        let b = locks.handle("app");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_distinct_projects_get_distinct_locks() {
        let locks = ProjectLocks::new();
        let a = locks.handle("app");
        let b = locks.handle("other");
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
