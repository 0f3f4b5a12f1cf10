//! Static extraction strategy - read the dependency list off the syntax tree.
//!
//! Nothing in the file is evaluated: every top-level class definition is a
//! component, and a class-body assignment of a literal to the well-known
//! attribute is its declared dependency list. A class without the assignment
//! declares zero dependencies; that is not an error.

use std::fs;

use tree_sitter::{Node, Parser};

use super::{normalize_depends, DependencyExtractor, DependsOn, ExtractedComponent};
use crate::errors::ExtractError;
use crate::runtime::value;
use crate::scanner::ModuleDescriptor;

/// Parse-without-executing extractor.
pub struct StaticExtractor {
    parser: Parser,
    attribute: String,
}

impl StaticExtractor {
    pub fn new(attribute: impl Into<String>) -> Self {
        let mut parser = Parser::new();
        let language = tree_sitter_python::LANGUAGE;
        parser
            .set_language(&language.into())
            .expect("python grammar is version-matched at build time");
        Self {
            parser,
            attribute: attribute.into(),
        }
    }

    /// Declared dependencies from a class body, if the attribute is assigned.
    fn class_depends(&self, class_node: Node, source: &[u8]) -> DependsOn {
        let Some(body) = class_node.child_by_field_name("body") else {
            return DependsOn::new();
        };
        for i in 0..body.named_child_count() {
            let Some(statement) = body.named_child(i) else { continue };
            if statement.kind() != "expression_statement" {
                continue;
            }
            let Some(expr) = statement.named_child(0) else { continue };
            if expr.kind() != "assignment" {
                continue;
            }
            let Some(left) = expr.child_by_field_name("left") else { continue };
            if left.kind() != "identifier"
                || left.utf8_text(source).unwrap_or("") != self.attribute
            {
                continue;
            }
            let Some(right) = expr.child_by_field_name("right") else { continue };
            if let Some(literal) = value::evaluate(right, source) {
                return normalize_depends(&literal);
            }
        }
        DependsOn::new()
    }
}

impl DependencyExtractor for StaticExtractor {
    fn extract(
        &mut self,
        descriptor: &ModuleDescriptor,
    ) -> Result<Vec<ExtractedComponent>, ExtractError> {
        let source = fs::read_to_string(&descriptor.file_path).map_err(|e| ExtractError::Read {
            path: descriptor.display_path.clone(),
            source: e,
        })?;
        let tree = crate::runtime::parse_module(&mut self.parser, descriptor, &source)?;
        let root = tree.root_node();
        let bytes = source.as_bytes();

        let mut components: Vec<ExtractedComponent> = Vec::new();
        for i in 0..root.named_child_count() {
            let Some(statement) = root.named_child(i) else { continue };
            let class_node = match statement.kind() {
                "class_definition" => statement,
                "decorated_definition" => match statement.child_by_field_name("definition") {
                    Some(definition) if definition.kind() == "class_definition" => definition,
                    _ => continue,
                },
                _ => continue,
            };
            let Some(name) = class_node
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(bytes).ok())
            else {
                continue;
            };

            let component = ExtractedComponent {
                name: name.to_string(),
                depends_on: self.class_depends(class_node, bytes),
                module: descriptor.clone(),
            };
            // Redefinition within one file: last definition wins, matching
            // what evaluation of the file would bind.
            if let Some(existing) = components.iter_mut().find(|c| c.name == component.name) {
                *existing = component;
            } else {
                components.push(component);
            }
        }
        Ok(components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn extract(source: &str) -> Vec<ExtractedComponent> {
        let dir = tempfile::TempDir::new().unwrap();
        let descriptor = write_module(dir.path(), "m_component.py", source);
        StaticExtractor::new("depends_on").extract(&descriptor).unwrap()
    }

    #[test]
    fn test_list_attribute() {
        let components = extract(
            r#"
class Invoice:
    depends_on = ["Customer", "Product"]
"#,
        );
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].name, "Invoice");
        assert_eq!(components[0].depends_on.as_slice(), ["Customer", "Product"]);
    }

    #[test]
    fn test_missing_attribute_means_no_dependencies() {
        let components = extract("class Customer:\n    table = 'customers'\n");
        assert_eq!(components.len(), 1);
        assert!(components[0].depends_on.is_empty());
    }

    #[test]
    fn test_bare_string_normalized() {
        let components = extract("class Invoice:\n    depends_on = 'Customer'\n");
        assert_eq!(components[0].depends_on.as_slice(), ["Customer"]);
    }

    #[test]
    fn test_nested_classes_are_not_components() {
        let components = extract(
            r#"
class Outer:
    class Meta:
        depends_on = ["X"]
"#,
        );
        let names: Vec<_> = components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Outer"]);
        assert!(components[0].depends_on.is_empty());
    }

    #[test]
    fn test_non_literal_attribute_ignored() {
        let components = extract("class Invoice:\n    depends_on = compute_deps()\n");
        assert!(components[0].depends_on.is_empty());
    }

    #[test]
    fn test_parse_error_fails_the_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let descriptor = write_module(dir.path(), "bad_component.py", "class (:\n");
        let err = StaticExtractor::new("depends_on")
            .extract(&descriptor)
            .unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }));
    }
}
