//! Fatal resolution errors.

use super::MaterializeError;
use crate::order::CycleReport;

/// Errors that abort a resolution run.
///
/// Discovery- and reference-level problems degrade gracefully and are reported
/// as [`crate::diagnostics::Warning`]s instead; anything here means no usable
/// registry was produced.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Two definition files declare a component with the same name. Silent
    /// shadowing would make the load order depend on scan order, so this is
    /// always fatal.
    #[error("duplicate component {name}: declared in {first} and {second}")]
    DuplicateComponent {
        name: String,
        first: String,
        second: String,
    },

    /// The sorter could not order every component. Carries the full
    /// multi-cycle diagnostic report.
    #[error("circular component dependencies:\n{0}")]
    CircularDependency(CycleReport),

    /// A component's defining module failed during the registration walk.
    #[error("failed to materialize component {component} (declared in {file}): {source}")]
    Materialization {
        component: String,
        file: String,
        #[source]
        source: MaterializeError,
    },

    /// A previous resolution attempt on this resolver failed, leaving the
    /// registry half-populated. Requires an explicit `reset()`.
    #[error("a previous resolution attempt failed; reset() the resolver before retrying")]
    PreviousAttemptFailed,
}
