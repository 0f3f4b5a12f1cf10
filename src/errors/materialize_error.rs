//! Materialization errors.

use super::ExtractError;

/// Errors that can occur while materializing a single component during the
/// registration walk. Unlike extraction errors these abort the whole run.
#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    /// The defining module could not be evaluated.
    #[error(transparent)]
    Module(#[from] ExtractError),

    /// The module evaluated, but defines no local class with this name.
    #[error("module {module} defines no component named {name}")]
    ObjectNotFound { name: String, module: String },
}
