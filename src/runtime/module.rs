//! Module evaluation - live class objects from definition files.
//!
//! Evaluating a module means walking its top-level statements and binding
//! class definitions, imported names, and literal assignments into a module
//! namespace. Class bodies contribute only their literal attribute
//! assignments; procedural code is ignored rather than executed.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tree_sitter::Node;

use super::component::Component;
use super::value::{self, Value};
use crate::errors::MaterializeError;
use crate::registry::Registry;
use crate::scanner::ModuleDescriptor;

/// A live class object produced by module evaluation.
#[derive(Debug)]
pub struct ClassObject {
    /// Class name as declared.
    pub name: String,
    /// Logical path of the module that defined it (not the one that bound it:
    /// aliases and re-exports keep the original origin).
    pub origin: String,
    /// Base-class names, in declaration order.
    pub bases: Vec<String>,
    /// Literal class-body attribute assignments.
    pub attrs: FxHashMap<String, Value>,
}

/// One name binding in a module namespace.
#[derive(Debug)]
pub enum Binding {
    /// A class defined (or aliased) in this module.
    Class(Arc<ClassObject>),
    /// A name imported from another module; opaque to the runtime.
    Import { source: String },
    /// A module-level literal assignment.
    Value(Value),
}

/// An evaluated definition file: the namespace plus binding order.
#[derive(Debug)]
pub struct ModuleInstance {
    pub logical_path: String,
    pub display_path: String,
    order: Vec<String>,
    bindings: FxHashMap<String, Binding>,
}

impl ModuleInstance {
    /// Evaluate a parsed module.
    pub(crate) fn evaluate(descriptor: &ModuleDescriptor, root: Node, source: &[u8]) -> Self {
        let mut module = Self {
            logical_path: descriptor.logical_path.clone(),
            display_path: descriptor.display_path.clone(),
            order: Vec::new(),
            bindings: FxHashMap::default(),
        };

        for i in 0..root.named_child_count() {
            let Some(statement) = root.named_child(i) else { continue };
            module.evaluate_statement(statement, source);
        }
        module
    }

    fn evaluate_statement(&mut self, statement: Node, source: &[u8]) {
        match statement.kind() {
            "class_definition" => self.bind_class(statement, source),
            "decorated_definition" => {
                if let Some(definition) = statement.child_by_field_name("definition") {
                    if definition.kind() == "class_definition" {
                        self.bind_class(definition, source);
                    }
                }
            }
            "import_from_statement" => self.bind_from_import(statement, source),
            "import_statement" => self.bind_import(statement, source),
            "expression_statement" => {
                let Some(expr) = statement.named_child(0) else { return };
                if expr.kind() == "assignment" {
                    self.bind_assignment(expr, source);
                }
            }
            _ => {}
        }
    }

    fn bind_class(&mut self, class_node: Node, source: &[u8]) {
        let Some(name) = field_text(class_node, "name", source) else {
            return;
        };

        let mut bases = Vec::new();
        if let Some(superclasses) = class_node.child_by_field_name("superclasses") {
            for i in 0..superclasses.named_child_count() {
                let Some(base) = superclasses.named_child(i) else { continue };
                match base.kind() {
                    "identifier" => {
                        if let Ok(text) = base.utf8_text(source) {
                            bases.push(text.to_string());
                        }
                    }
                    // `framework.Model` style: bind by the trailing segment.
                    "attribute" => {
                        if let Some(attr) = field_text(base, "attribute", source) {
                            bases.push(attr);
                        }
                    }
                    _ => {}
                }
            }
        }

        let mut attrs = FxHashMap::default();
        if let Some(body) = class_node.child_by_field_name("body") {
            for i in 0..body.named_child_count() {
                let Some(statement) = body.named_child(i) else { continue };
                if statement.kind() != "expression_statement" {
                    continue;
                }
                let Some(expr) = statement.named_child(0) else { continue };
                if expr.kind() != "assignment" {
                    continue;
                }
                let Some((key, value)) = literal_assignment(expr, source) else {
                    continue;
                };
                attrs.insert(key, value);
            }
        }

        let object = Arc::new(ClassObject {
            name: name.clone(),
            origin: self.logical_path.clone(),
            bases,
            attrs,
        });
        self.bind(name, Binding::Class(object));
    }

    fn bind_from_import(&mut self, statement: Node, source: &[u8]) {
        let module_node = statement.child_by_field_name("module_name");
        let module = module_node
            .and_then(|n| n.utf8_text(source).ok())
            .unwrap_or("")
            .to_string();

        for i in 0..statement.named_child_count() {
            let Some(child) = statement.named_child(i) else { continue };
            if module_node.map(|m| m.id() == child.id()).unwrap_or(false) {
                continue;
            }
            let bound = match child.kind() {
                "dotted_name" => child
                    .utf8_text(source)
                    .ok()
                    .and_then(|t| t.rsplit('.').next())
                    .map(str::to_string),
                "aliased_import" => field_text(child, "alias", source),
                _ => None,
            };
            if let Some(name) = bound {
                self.bind(
                    name,
                    Binding::Import {
                        source: module.clone(),
                    },
                );
            }
        }
    }

    fn bind_import(&mut self, statement: Node, source: &[u8]) {
        for i in 0..statement.named_child_count() {
            let Some(child) = statement.named_child(i) else { continue };
            let (bound, source_module) = match child.kind() {
                "dotted_name" => {
                    let text = child.utf8_text(source).unwrap_or("").to_string();
                    let first = text.split('.').next().unwrap_or("").to_string();
                    (Some(first), text)
                }
                "aliased_import" => (
                    field_text(child, "alias", source),
                    field_text(child, "name", source).unwrap_or_default(),
                ),
                _ => (None, String::new()),
            };
            if let Some(name) = bound {
                if !name.is_empty() {
                    self.bind(
                        name,
                        Binding::Import {
                            source: source_module,
                        },
                    );
                }
            }
        }
    }

    fn bind_assignment(&mut self, assignment: Node, source: &[u8]) {
        let Some(left) = assignment.child_by_field_name("left") else {
            return;
        };
        if left.kind() != "identifier" {
            return;
        }
        let Some(name) = left.utf8_text(source).ok().map(str::to_string) else {
            return;
        };
        let Some(right) = assignment.child_by_field_name("right") else {
            return;
        };

        // `Alias = ExistingName` re-binds whatever the name refers to; the
        // original origin is preserved so re-exports stay distinguishable.
        if right.kind() == "identifier" {
            if let Ok(target) = right.utf8_text(source) {
                let aliased = match self.bindings.get(target) {
                    Some(Binding::Class(object)) => Some(Binding::Class(object.clone())),
                    Some(Binding::Import { source }) => Some(Binding::Import {
                        source: source.clone(),
                    }),
                    Some(Binding::Value(value)) => Some(Binding::Value(value.clone())),
                    None => None,
                };
                if let Some(binding) = aliased {
                    self.bind(name, binding);
                }
            }
            return;
        }

        if let Some(value) = value::evaluate(right, source) {
            self.bind(name, Binding::Value(value));
        }
    }

    fn bind(&mut self, name: String, binding: Binding) {
        if !self.bindings.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.bindings.insert(name, binding);
    }

    /// Look up a name in the module namespace.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Classes defined by this module, in definition order. Imported and
    /// aliased names are excluded: only bindings whose object originates here
    /// and still carries its declared name count as definitions.
    pub fn local_classes(&self) -> impl Iterator<Item = &Arc<ClassObject>> {
        self.order.iter().filter_map(|name| match self.bindings.get(name) {
            Some(Binding::Class(object))
                if object.origin == self.logical_path && &object.name == name =>
            {
                Some(object)
            }
            _ => None,
        })
    }

    /// Materialize the named component: extract the class object and resolve
    /// its base-class names through the registry. The load order guarantees
    /// that every base which is itself a component is already registered.
    pub fn materialize(
        &self,
        name: &str,
        registry: &Registry,
    ) -> Result<Arc<Component>, MaterializeError> {
        let object = match self.get(name) {
            Some(Binding::Class(object)) if object.origin == self.logical_path => object.clone(),
            _ => {
                return Err(MaterializeError::ObjectNotFound {
                    name: name.to_string(),
                    module: self.logical_path.clone(),
                })
            }
        };

        let mut bases = Vec::new();
        let mut external_bases = Vec::new();
        for base in &object.bases {
            match registry.get(base) {
                Some(component) => bases.push(component),
                None => external_bases.push(base.clone()),
            }
        }

        Ok(Arc::new(Component::new(
            object.name.clone(),
            self.display_path.clone(),
            bases,
            external_bases,
            object.attrs.clone(),
        )))
    }
}

fn field_text(node: Node, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)?
        .utf8_text(source)
        .ok()
        .map(str::to_string)
}

/// `key = <literal>` inside a class body, or `None` if the right-hand side is
/// not a literal.
fn literal_assignment(assignment: Node, source: &[u8]) -> Option<(String, Value)> {
    let left = assignment.child_by_field_name("left")?;
    if left.kind() != "identifier" {
        return None;
    }
    let key = left.utf8_text(source).ok()?.to_string();
    let right = assignment.child_by_field_name("right")?;
    let value = value::evaluate(right, source)?;
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;
    use std::path::PathBuf;

    fn descriptor(logical: &str) -> ModuleDescriptor {
        ModuleDescriptor {
            logical_path: logical.to_string(),
            display_path: format!("{}.py", logical.replace('.', "/")),
            file_path: PathBuf::from("/nonexistent"),
        }
    }

    fn evaluate(source: &str) -> ModuleInstance {
        let mut runtime = Runtime::new();
        runtime
            .evaluate_source(&descriptor("app.orders_component"), source)
            .unwrap()
    }

    #[test]
    fn test_class_with_bases_and_attrs() {
        let module = evaluate(
            r#"
class Order(Document):
    depends_on = ["Customer"]
    table = "orders"

    def total(self):
        return 0
"#,
        );
        let classes: Vec<_> = module.local_classes().collect();
        assert_eq!(classes.len(), 1);
        let order = &classes[0];
        assert_eq!(order.name, "Order");
        assert_eq!(order.origin, "app.orders_component");
        assert_eq!(order.bases, vec!["Document".to_string()]);
        assert_eq!(
            order.attrs.get("depends_on"),
            Some(&Value::List(vec![Value::Str("Customer".into())]))
        );
        assert_eq!(order.attrs.get("table"), Some(&Value::Str("orders".into())));
        assert!(!order.attrs.contains_key("total"));
    }

    #[test]
    fn test_imports_are_not_local_classes() {
        let module = evaluate(
            r#"
from framework.models import Document
import json

class Order(Document):
    pass
"#,
        );
        let names: Vec<_> = module.local_classes().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Order"]);
        assert!(matches!(module.get("Document"), Some(Binding::Import { .. })));
        assert!(matches!(module.get("json"), Some(Binding::Import { .. })));
    }

    #[test]
    fn test_alias_does_not_duplicate_definition() {
        let module = evaluate(
            r#"
class Order:
    pass

LegacyOrder = Order
"#,
        );
        let names: Vec<_> = module.local_classes().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Order"]);
        assert!(matches!(module.get("LegacyOrder"), Some(Binding::Class(_))));
    }

    #[test]
    fn test_redefinition_last_wins() {
        let module = evaluate(
            r#"
class Order:
    table = "first"

class Order:
    table = "second"
"#,
        );
        let classes: Vec<_> = module.local_classes().collect();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].attrs.get("table"), Some(&Value::Str("second".into())));
    }

    #[test]
    fn test_decorated_class_is_bound() {
        let module = evaluate(
            r#"
@register
class Order:
    pass
"#,
        );
        assert_eq!(module.local_classes().count(), 1);
    }

    #[test]
    fn test_materialize_unknown_name_fails() {
        let module = evaluate("class Order:\n    pass\n");
        let registry = Registry::new();
        let err = module.materialize("Customer", &registry).unwrap_err();
        assert!(matches!(err, MaterializeError::ObjectNotFound { .. }));
    }
}
