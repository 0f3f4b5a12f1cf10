//! Non-fatal diagnostics and the per-run resolution report.

use serde::{Deserialize, Serialize};

/// A non-fatal problem observed during resolution.
///
/// Warnings never abort a run: the affected root, file, or edge is dropped and
/// resolution continues on the remainder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A scan root does not exist or is not a directory.
    MissingRoot { root: String },

    /// A definition file could not be read or parsed; its components are
    /// absent from the graph.
    ExtractionFailed { file: String, message: String },

    /// A declared dependency names a component absent from the scan. The edge
    /// is dropped; the dependent stays orderable.
    DanglingReference {
        component: String,
        dependency: String,
        file: String,
    },

    /// A component declares a dependency on itself. The edge is dropped.
    SelfDependency { component: String, file: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRoot { root } => {
                write!(f, "scan root {root} does not exist, skipping")
            }
            Self::ExtractionFailed { file, message } => {
                write!(f, "skipping {file}: {message}")
            }
            Self::DanglingReference {
                component,
                dependency,
                file,
            } => write!(
                f,
                "{component} (declared in {file}) depends on unknown component {dependency}, \
                 dropping edge"
            ),
            Self::SelfDependency { component, file } => {
                write!(f, "{component} (declared in {file}) depends on itself, dropping edge")
            }
        }
    }
}

/// Summary of one resolution run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveReport {
    /// Definition files discovered by the scanner.
    pub modules_discovered: usize,
    /// Components extracted across all files.
    pub components_discovered: usize,
    /// Components materialized and registered.
    pub components_loaded: usize,
    /// Components that failed to materialize (0 or 1: the first failure aborts).
    pub components_failed: usize,
    /// The computed load order, complete only on success.
    pub load_order: Vec<String>,
    /// Components registered before a materialization failure, for diagnosis.
    pub loaded_before_failure: Vec<String>,
    /// All non-fatal warnings, in the order they were observed.
    pub warnings: Vec<Warning>,
}

impl ResolveReport {
    pub(crate) fn warn(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let w = Warning::DanglingReference {
            component: "Invoice".into(),
            dependency: "Ledger".into(),
            file: "billing/invoice_component.py".into(),
        };
        let text = w.to_string();
        assert!(text.contains("Invoice"));
        assert!(text.contains("unknown component Ledger"));
    }

    #[test]
    fn test_report_serializes() {
        let mut report = ResolveReport::default();
        report.warnings.push(Warning::MissingRoot { root: "x".into() });
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("missing_root"));
    }
}
