//! Resolver - orchestrates the full discover/extract/order/load pipeline.
//!
//! The pipeline runs single-threaded to completion, once: materialization
//! order is a correctness requirement, and the idempotence guard is a plain
//! state check, so resolution belongs in single-threaded startup before any
//! worker threads exist.

use crate::config::{ExtractionStrategy, ResolveConfig};
use crate::diagnostics::{ResolveReport, Warning};
use crate::errors::ResolveError;
use crate::extract::{
    DependencyExtractor, ExtractedComponent, RuntimeExtractor, StaticExtractor,
};
use crate::graph;
use crate::loader::Loader;
use crate::order::{self, SortOutcome};
use crate::registry::{Registry, RegistryState};
use crate::runtime::Runtime;
use crate::scanner::{ModuleDescriptor, Scanner};

/// Owns the registry, the module runtime, and the once-per-process guard.
pub struct Resolver {
    config: ResolveConfig,
    runtime: Runtime,
    registry: Registry,
    report: ResolveReport,
}

impl Resolver {
    pub fn new(config: ResolveConfig) -> Self {
        Self {
            config,
            runtime: Runtime::new(),
            registry: Registry::new(),
            report: ResolveReport::default(),
        }
    }

    /// Run the pipeline. Idempotent on success: a second call returns the
    /// ready registry without re-running anything. After a failed attempt the
    /// registry is unusable and an explicit [`Resolver::reset`] is required.
    pub fn resolve(&mut self) -> Result<&Registry, ResolveError> {
        match self.registry.state() {
            RegistryState::Ready => return Ok(&self.registry),
            RegistryState::Populating => return Err(ResolveError::PreviousAttemptFailed),
            RegistryState::Uninitialized => {}
        }

        self.report = ResolveReport::default();

        let modules = Scanner::new(&self.config).scan(&mut self.report);
        self.report.modules_discovered = modules.len();

        let extracted = match self.config.strategy {
            ExtractionStrategy::Static => {
                let mut extractor = StaticExtractor::new(self.config.attribute.as_str());
                extract_all(&mut extractor, &modules, &mut self.report)
            }
            ExtractionStrategy::Runtime => {
                let mut extractor =
                    RuntimeExtractor::new(&mut self.runtime, self.config.attribute.as_str());
                extract_all(&mut extractor, &modules, &mut self.report)
            }
        };
        self.report.components_discovered = extracted.len();

        let built = graph::build(extracted, &mut self.report)?;

        let load_order = match order::sort(&built.graph) {
            SortOutcome::Complete(load_order) => load_order,
            SortOutcome::Stuck { stuck, .. } => {
                let cycle_report = order::analyze(&built.graph, &stuck, &built.components);
                return Err(ResolveError::CircularDependency(cycle_report));
            }
        };
        self.report.load_order = load_order.clone();

        self.registry.begin_populating();
        let outcome = Loader::new(&mut self.runtime, &built.components).load_all(
            &load_order,
            &mut self.registry,
            &mut self.report,
        );
        match outcome {
            Ok(()) => {
                self.registry.seal();
                self.report.components_loaded = self.registry.len();
                self.log_summary();
                Ok(&self.registry)
            }
            Err(error) => {
                self.report.components_loaded = self.report.loaded_before_failure.len();
                self.log_summary();
                Err(error)
            }
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn report(&self) -> &ResolveReport {
        &self.report
    }

    /// Debug/tooling only: clear the registry, the module cache, and the
    /// guard so the pipeline can run again. Never safe to call while other
    /// threads hold the registry.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.runtime = Runtime::new();
        self.report = ResolveReport::default();
    }

    fn log_summary(&self) {
        tracing::info!(
            "resolution summary: {} files scanned, {} components discovered, \
             {} loaded, {} failed, {} warnings",
            self.report.modules_discovered,
            self.report.components_discovered,
            self.report.components_loaded,
            self.report.components_failed,
            self.report.warnings.len(),
        );
    }
}

// The runtime holds a tree-sitter parser, which has no Debug impl.
impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

/// Run the full pipeline once and return the resolver owning the ready
/// registry.
pub fn resolve(config: ResolveConfig) -> Result<Resolver, ResolveError> {
    let mut resolver = Resolver::new(config);
    resolver.resolve()?;
    Ok(resolver)
}

fn extract_all(
    extractor: &mut dyn DependencyExtractor,
    modules: &[ModuleDescriptor],
    report: &mut ResolveReport,
) -> Vec<ExtractedComponent> {
    let mut extracted = Vec::new();
    for descriptor in modules {
        match extractor.extract(descriptor) {
            Ok(components) => extracted.extend(components),
            Err(error) => {
                report.warn(Warning::ExtractionFailed {
                    file: descriptor.display_path.clone(),
                    message: error.to_string(),
                });
            }
        }
    }
    extracted
}
