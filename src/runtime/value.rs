//! Literal values and literal-expression evaluation.
//!
//! The component runtime only ever evaluates the declarative subset of a
//! definition file: string, number, bool, `None`, list/tuple, and dict
//! literals. Anything else evaluates to nothing and the binding is dropped.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

/// A literal attribute value on a component class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Dict(Vec<(Value, Value)>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Evaluate a literal expression node, or `None` if it is not a literal.
pub fn evaluate(node: Node, source: &[u8]) -> Option<Value> {
    match node.kind() {
        "string" => Some(Value::Str(string_text(node, source))),
        "integer" => {
            let text = node.utf8_text(source).ok()?.replace('_', "");
            text.parse::<i64>().ok().map(Value::Int)
        }
        "float" => {
            let text = node.utf8_text(source).ok()?.replace('_', "");
            text.parse::<f64>().ok().map(Value::Float)
        }
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "none" => Some(Value::None),
        "list" | "tuple" | "set" => {
            let mut items = Vec::new();
            for i in 0..node.named_child_count() {
                if let Some(value) = node.named_child(i).and_then(|c| evaluate(c, source)) {
                    items.push(value);
                }
            }
            Some(Value::List(items))
        }
        "dictionary" => {
            let mut pairs = Vec::new();
            for i in 0..node.named_child_count() {
                let Some(pair) = node.named_child(i) else { continue };
                if pair.kind() != "pair" {
                    continue;
                }
                let key = pair.child_by_field_name("key").and_then(|k| evaluate(k, source));
                let value = pair
                    .child_by_field_name("value")
                    .and_then(|v| evaluate(v, source));
                if let (Some(key), Some(value)) = (key, value) {
                    pairs.push((key, value));
                }
            }
            Some(Value::Dict(pairs))
        }
        "parenthesized_expression" => node.named_child(0).and_then(|c| evaluate(c, source)),
        "unary_operator" => {
            let negated = node.child(0).map(|c| c.kind() == "-").unwrap_or(false);
            if !negated {
                return None;
            }
            match node.child_by_field_name("argument").and_then(|a| evaluate(a, source))? {
                Value::Int(n) => Some(Value::Int(-n)),
                Value::Float(n) => Some(Value::Float(-n)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Text of a string literal with the quotes stripped and escapes processed.
fn string_text(node: Node, source: &[u8]) -> String {
    let mut out = String::new();
    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else { continue };
        match child.kind() {
            // The grammar nests escape_sequence nodes inside string_content;
            // the raw text between them is literal.
            "string_content" => push_content(child, source, &mut out),
            "escape_sequence" => out.push_str(&unescape(child.utf8_text(source).unwrap_or(""))),
            _ => {}
        }
    }
    out
}

fn push_content(content: Node, source: &[u8], out: &mut String) {
    let mut cursor = content.start_byte();
    for i in 0..content.child_count() {
        let Some(child) = content.child(i) else { continue };
        if child.kind() != "escape_sequence" {
            continue;
        }
        if let Ok(literal) = std::str::from_utf8(&source[cursor..child.start_byte()]) {
            out.push_str(literal);
        }
        out.push_str(&unescape(child.utf8_text(source).unwrap_or("")));
        cursor = child.end_byte();
    }
    if let Ok(tail) = std::str::from_utf8(&source[cursor..content.end_byte()]) {
        out.push_str(tail);
    }
}

fn unescape(escape: &str) -> String {
    match escape {
        "\\n" => "\n".to_string(),
        "\\t" => "\t".to_string(),
        "\\r" => "\r".to_string(),
        "\\\\" => "\\".to_string(),
        "\\'" => "'".to_string(),
        "\\\"" => "\"".to_string(),
        other => other.trim_start_matches('\\').to_string(),
    }
}
