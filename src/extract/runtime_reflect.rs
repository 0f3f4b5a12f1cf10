//! Runtime extraction strategy - evaluate the module, reflect the attribute.
//!
//! The module goes through the shared [`Runtime`], so the evaluation done here
//! is the same one the registration walk will reuse. Only classes whose origin
//! is the module itself are components; imported and re-exported names are
//! skipped.

use super::{normalize_depends, DependencyExtractor, DependsOn, ExtractedComponent};
use crate::errors::ExtractError;
use crate::runtime::Runtime;
use crate::scanner::ModuleDescriptor;

/// Import-then-reflect extractor over the shared runtime.
pub struct RuntimeExtractor<'a> {
    runtime: &'a mut Runtime,
    attribute: String,
}

impl<'a> RuntimeExtractor<'a> {
    pub fn new(runtime: &'a mut Runtime, attribute: impl Into<String>) -> Self {
        Self {
            runtime,
            attribute: attribute.into(),
        }
    }
}

impl DependencyExtractor for RuntimeExtractor<'_> {
    fn extract(
        &mut self,
        descriptor: &ModuleDescriptor,
    ) -> Result<Vec<ExtractedComponent>, ExtractError> {
        let module = self.runtime.load_module(descriptor)?;

        Ok(module
            .local_classes()
            .map(|object| ExtractedComponent {
                name: object.name.clone(),
                depends_on: object
                    .attrs
                    .get(&self.attribute)
                    .map(normalize_depends)
                    .unwrap_or_else(DependsOn::new),
                module: descriptor.clone(),
            })
            .collect())
    }
}
