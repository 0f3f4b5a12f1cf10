//! Scanner types - descriptors for discovered definition files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One discovered component definition file.
///
/// Created once per scan pass and immutable afterwards; a fresh resolution run
/// rebuilds descriptors from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Dotted import identifier derived from the file's location relative to
    /// its scan root (`app/billing/invoice_component.py` ->
    /// `app.billing.invoice_component`).
    pub logical_path: String,
    /// Root-relative path for diagnostics.
    pub display_path: String,
    /// Absolute filesystem path.
    pub file_path: PathBuf,
}
