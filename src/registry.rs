//! Component registry - write-once-then-frozen name to component store.
//!
//! The registry is an explicit object owned by the host's startup routine,
//! populated one entry at a time in load order, then sealed. Once `Ready` it
//! is never written again (outside the debug-only reset), which is what makes
//! sharing it across reader threads safe.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::runtime::Component;

/// Registry lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RegistryState {
    /// No resolution attempted yet.
    #[default]
    Uninitialized,
    /// A resolution run is writing entries (or failed partway through).
    Populating,
    /// Resolution completed; the registry is frozen.
    Ready,
}

/// The process's component store, keyed by component name.
#[derive(Debug, Default)]
pub struct Registry {
    state: RegistryState,
    entries: FxHashMap<String, Arc<Component>>,
    order: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    /// True once resolution completed; a registry that is not ready must be
    /// treated as unusable by the host.
    pub fn is_ready(&self) -> bool {
        self.state == RegistryState::Ready
    }

    /// Look up a component by name.
    pub fn get(&self, name: &str) -> Option<Arc<Component>> {
        self.entries.get(name).cloned()
    }

    /// All registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Debug/tooling only: drop every entry and the resolution guard so the
    /// pipeline can run again. Not safe to call concurrently with lookups.
    pub fn reset(&mut self) {
        self.state = RegistryState::Uninitialized;
        self.entries.clear();
        self.order.clear();
    }

    pub(crate) fn begin_populating(&mut self) {
        debug_assert_eq!(self.state, RegistryState::Uninitialized);
        self.state = RegistryState::Populating;
    }

    pub(crate) fn insert(&mut self, name: String, component: Arc<Component>) {
        debug_assert_eq!(self.state, RegistryState::Populating);
        if self.entries.insert(name.clone(), component).is_none() {
            self.order.push(name);
        }
    }

    pub(crate) fn seal(&mut self) {
        debug_assert_eq!(self.state, RegistryState::Populating);
        self.state = RegistryState::Ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str) -> Arc<Component> {
        Arc::new(Component::new(
            name.to_string(),
            format!("{name}_component.py"),
            vec![],
            vec![],
            FxHashMap::default(),
        ))
    }

    #[test]
    fn test_lifecycle() {
        let mut registry = Registry::new();
        assert_eq!(registry.state(), RegistryState::Uninitialized);

        registry.begin_populating();
        registry.insert("A".into(), component("A"));
        registry.insert("B".into(), component("B"));
        registry.seal();

        assert!(registry.is_ready());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["A", "B"]);
        assert_eq!(registry.get("A").unwrap().name(), "A");
        assert!(registry.get("Z").is_none());
    }

    #[test]
    fn test_reset_clears_entries_and_guard() {
        let mut registry = Registry::new();
        registry.begin_populating();
        registry.insert("A".into(), component("A"));
        registry.seal();

        registry.reset();
        assert_eq!(registry.state(), RegistryState::Uninitialized);
        assert!(registry.is_empty());
        assert!(registry.get("A").is_none());
    }
}
