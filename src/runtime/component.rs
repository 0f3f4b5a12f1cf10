//! Materialized components.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::value::Value;

/// A materialized, registered component.
///
/// Built exactly once by the registration walk and never mutated afterwards,
/// which is what makes concurrent registry reads safe once resolution is done.
/// Base components are held as `Arc` references into the registry: their
/// presence is the observable proof that every prerequisite was published
/// before this component was constructed.
#[derive(Debug)]
pub struct Component {
    name: String,
    module: String,
    bases: Vec<Arc<Component>>,
    external_bases: Vec<String>,
    attrs: FxHashMap<String, Value>,
}

impl Component {
    pub(crate) fn new(
        name: String,
        module: String,
        bases: Vec<Arc<Component>>,
        external_bases: Vec<String>,
        attrs: FxHashMap<String, Value>,
    ) -> Self {
        Self {
            name,
            module,
            bases,
            external_bases,
            attrs,
        }
    }

    /// Component name, the registry key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root-relative path of the defining file.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Base components that were resolvable through the registry at
    /// materialization time, in declaration order.
    pub fn bases(&self) -> &[Arc<Component>] {
        &self.bases
    }

    /// Base-class names that named no registered component (host framework
    /// base classes, mixins from libraries).
    pub fn external_bases(&self) -> &[String] {
        &self.external_bases
    }

    /// Attribute declared directly on this component.
    pub fn own_attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// Attribute lookup through the inheritance chain: own attributes first,
    /// then each base depth-first in declaration order.
    pub fn attr(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.attrs.get(key) {
            return Some(value);
        }
        self.bases.iter().find_map(|base| base.attr(key))
    }
}
