//! Component runtime - evaluates definition files into live class objects.
//!
//! One evaluation per file: the runtime caches every loaded module by file
//! path, so the dynamic extractor and the registration walk share a single
//! materialization of each defining file, exactly like an import cache.

pub mod component;
pub mod module;
pub mod value;

pub use component::Component;
pub use module::{Binding, ClassObject, ModuleInstance};
pub use value::Value;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tree_sitter::{Node, Parser, Tree};

use crate::errors::ExtractError;
use crate::scanner::ModuleDescriptor;

/// The module runtime: parser plus the per-process module cache.
pub struct Runtime {
    parser: Parser,
    // Keyed by the descriptor's (canonical) file path: logical paths are only
    // unique within one scan root, file paths are unique process-wide.
    modules: FxHashMap<PathBuf, Arc<ModuleInstance>>,
}

impl Runtime {
    pub fn new() -> Self {
        let mut parser = Parser::new();
        let language = tree_sitter_python::LANGUAGE;
        parser
            .set_language(&language.into())
            .expect("python grammar is version-matched at build time");
        Self {
            parser,
            modules: FxHashMap::default(),
        }
    }

    /// Load a module, evaluating its file at most once per process.
    pub fn load_module(
        &mut self,
        descriptor: &ModuleDescriptor,
    ) -> Result<Arc<ModuleInstance>, ExtractError> {
        if let Some(module) = self.modules.get(&descriptor.file_path) {
            return Ok(module.clone());
        }

        let source = fs::read_to_string(&descriptor.file_path).map_err(|e| ExtractError::Read {
            path: descriptor.display_path.clone(),
            source: e,
        })?;
        let module = Arc::new(self.evaluate_source(descriptor, &source)?);
        self.modules
            .insert(descriptor.file_path.clone(), module.clone());
        Ok(module)
    }

    pub(crate) fn evaluate_source(
        &mut self,
        descriptor: &ModuleDescriptor,
        source: &str,
    ) -> Result<ModuleInstance, ExtractError> {
        let tree = parse_module(&mut self.parser, descriptor, source)?;
        Ok(ModuleInstance::evaluate(
            descriptor,
            tree.root_node(),
            source.as_bytes(),
        ))
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one definition file, treating any syntax error as a failure of the
/// whole file.
pub(crate) fn parse_module(
    parser: &mut Parser,
    descriptor: &ModuleDescriptor,
    source: &str,
) -> Result<Tree, ExtractError> {
    let tree = parser.parse(source, None).ok_or_else(|| ExtractError::Parse {
        path: descriptor.display_path.clone(),
        message: "parser produced no tree".to_string(),
    })?;

    if tree.root_node().has_error() {
        let position = first_error(tree.root_node())
            .map(|node| {
                let p = node.start_position();
                format!("line {}, column {}", p.row + 1, p.column + 1)
            })
            .unwrap_or_else(|| "unknown position".to_string());
        return Err(ExtractError::Parse {
            path: descriptor.display_path.clone(),
            message: format!("invalid syntax at {position}"),
        });
    }
    Ok(tree)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    for i in 0..node.child_count() {
        if let Some(found) = node.child(i).and_then(first_error) {
            return Some(found);
        }
    }
    None
}
