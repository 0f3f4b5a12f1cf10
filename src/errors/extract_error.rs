//! Extraction errors.
//!
//! These are fatal for the one file they occur in, never for the overall
//! resolution run: the resolver downgrades them to warnings and drops that
//! file's components from the graph.

/// Errors that can occur while extracting components from one definition file.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}
