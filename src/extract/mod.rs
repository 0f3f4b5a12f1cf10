//! Dependency extraction - two interchangeable strategies, one output shape.
//!
//! Everything after the extractor only ever sees `name -> declared
//! dependencies`, so the static and runtime strategies are freely swappable.

pub mod runtime_reflect;
pub mod static_ast;

pub use runtime_reflect::RuntimeExtractor;
pub use static_ast::StaticExtractor;

use smallvec::SmallVec;

use crate::errors::ExtractError;
use crate::runtime::Value;
use crate::scanner::ModuleDescriptor;

/// Declared dependency names; almost always a handful.
pub type DependsOn = SmallVec<[String; 4]>;

/// One component found in a definition file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedComponent {
    /// Declared component name.
    pub name: String,
    /// Declared prerequisite names, as written (uncleaned: deduplication,
    /// self-references, and dangling names are the graph builder's job).
    pub depends_on: DependsOn,
    /// The defining file.
    pub module: ModuleDescriptor,
}

/// A dependency extraction strategy.
///
/// A failure applies to the one file passed in; the resolver downgrades it to
/// a warning and continues without that file's components.
pub trait DependencyExtractor {
    fn extract(
        &mut self,
        descriptor: &ModuleDescriptor,
    ) -> Result<Vec<ExtractedComponent>, ExtractError>;
}

/// Normalize the well-known attribute's value into a dependency list: a bare
/// string becomes a one-element list, non-string list members are dropped.
pub(crate) fn normalize_depends(value: &Value) -> DependsOn {
    match value {
        Value::Str(name) => std::iter::once(name.clone()).collect(),
        Value::List(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => DependsOn::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_depends() {
        assert_eq!(
            normalize_depends(&Value::Str("A".into())).as_slice(),
            ["A".to_string()]
        );
        assert_eq!(
            normalize_depends(&Value::List(vec![
                Value::Str("A".into()),
                Value::Int(3),
                Value::Str("B".into()),
            ]))
            .as_slice(),
            ["A".to_string(), "B".to_string()]
        );
        assert!(normalize_depends(&Value::Int(1)).is_empty());
    }
}
