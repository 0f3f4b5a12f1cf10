//! Loader/registrar - materialize components in order, publish immediately.
//!
//! Publication is interleaved with materialization on purpose: a declared
//! dependency is a name reference, not an import, so a component's own
//! construction may look prerequisites up in the registry. The load order
//! guarantees that lookup succeeds only because every earlier component was
//! published before this one started materializing.

use rustc_hash::FxHashMap;

use crate::diagnostics::ResolveReport;
use crate::errors::ResolveError;
use crate::graph::ComponentDescriptor;
use crate::registry::Registry;
use crate::runtime::Runtime;

/// The registration walk over a complete load order.
pub struct Loader<'a> {
    runtime: &'a mut Runtime,
    components: &'a FxHashMap<String, ComponentDescriptor>,
}

impl<'a> Loader<'a> {
    pub fn new(
        runtime: &'a mut Runtime,
        components: &'a FxHashMap<String, ComponentDescriptor>,
    ) -> Self {
        Self {
            runtime,
            components,
        }
    }

    /// Materialize and register every component, in order. The first failure
    /// aborts the run; the registry keeps what was already registered so the
    /// failure report can say how far the walk got.
    pub fn load_all(
        &mut self,
        order: &[String],
        registry: &mut Registry,
        report: &mut ResolveReport,
    ) -> Result<(), ResolveError> {
        for name in order {
            let Some(descriptor) = self.components.get(name) else {
                continue;
            };
            if let Err(error) = self.load_one(descriptor, registry) {
                report.loaded_before_failure = registry.names();
                report.components_failed = 1;
                return Err(ResolveError::Materialization {
                    component: name.clone(),
                    file: descriptor.module.display_path.clone(),
                    source: error,
                });
            }
            tracing::debug!("registered component {name}");
        }
        Ok(())
    }

    fn load_one(
        &mut self,
        descriptor: &ComponentDescriptor,
        registry: &mut Registry,
    ) -> Result<(), crate::errors::MaterializeError> {
        // Cached per file: components sharing a defining module share one
        // evaluation.
        let module = self.runtime.load_module(&descriptor.module)?;
        let component = module.materialize(&descriptor.name, registry)?;
        registry.insert(descriptor.name.clone(), component);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MaterializeError;
    use crate::scanner::ModuleDescriptor;
    use std::fs;
    use std::path::Path;

    fn write_module(dir: &Path, rel: &str, text: &str) -> ModuleDescriptor {
        let path = dir.join(rel);
        fs::write(&path, text).unwrap();
        ModuleDescriptor {
            logical_path: rel.trim_end_matches(".py").to_string(),
            display_path: rel.to_string(),
            file_path: path,
        }
    }

    fn descriptor_map(
        entries: &[(&str, &[&str], &ModuleDescriptor)],
    ) -> FxHashMap<String, ComponentDescriptor> {
        entries
            .iter()
            .map(|(name, deps, module)| {
                (
                    name.to_string(),
                    ComponentDescriptor {
                        name: name.to_string(),
                        depends_on: deps.iter().map(|d| d.to_string()).collect(),
                        module: (*module).clone(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_prerequisites_visible_during_materialization() {
        let dir = tempfile::TempDir::new().unwrap();
        let customers =
            write_module(dir.path(), "customer_component.py", "class Customer:\n    pass\n");
        let invoices = write_module(
            dir.path(),
            "invoice_component.py",
            "class Invoice(Customer):\n    depends_on = [\"Customer\"]\n",
        );

        let mut runtime = Runtime::new();
        let components = descriptor_map(&[
            ("Customer", &[], &customers),
            ("Invoice", &["Customer"], &invoices),
        ]);
        let mut registry = Registry::new();
        let mut report = ResolveReport::default();

        registry.begin_populating();
        Loader::new(&mut runtime, &components)
            .load_all(
                &["Customer".to_string(), "Invoice".to_string()],
                &mut registry,
                &mut report,
            )
            .unwrap();
        registry.seal();

        // Invoice's base resolved through the registry, proving Customer was
        // published before Invoice materialized.
        let invoice = registry.get("Invoice").unwrap();
        assert_eq!(invoice.bases().len(), 1);
        assert_eq!(invoice.bases()[0].name(), "Customer");
    }

    #[test]
    fn test_failure_keeps_earlier_registrations_for_diagnosis() {
        let dir = tempfile::TempDir::new().unwrap();
        let ok = write_module(dir.path(), "a_component.py", "class A:\n    pass\n");
        // Declared name does not match any class in the file.
        let broken = write_module(dir.path(), "b_component.py", "class NotB:\n    pass\n");

        let mut runtime = Runtime::new();
        let components = descriptor_map(&[("A", &[], &ok), ("B", &[], &broken)]);
        let mut registry = Registry::new();
        let mut report = ResolveReport::default();

        registry.begin_populating();
        let err = Loader::new(&mut runtime, &components)
            .load_all(
                &["A".to_string(), "B".to_string()],
                &mut registry,
                &mut report,
            )
            .unwrap_err();

        match err {
            ResolveError::Materialization {
                component, source, ..
            } => {
                assert_eq!(component, "B");
                assert!(matches!(source, MaterializeError::ObjectNotFound { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(report.loaded_before_failure, vec!["A"]);
        assert!(!registry.is_ready());
    }
}
