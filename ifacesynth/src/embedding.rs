//! Struct embedding relations and their transitive closure.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use tracing::warn;

use crate::ast::{SourceFile, TypeExpr, TypeKind};
use crate::parser::{ParseError, ParsedFile};

/// Maps each struct name to the base names of the types it embeds, in field
/// order. Every struct has an entry, even when it embeds nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddingGraph {
    edges: IndexMap<String, Vec<String>>,
}

impl EmbeddingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(file: &SourceFile) -> Self {
        let mut graph = EmbeddingGraph::new();
        for (_, spec) in file.type_specs() {
            let TypeKind::Struct(fields) = &spec.ty.kind else {
                continue;
            };
            let entry = graph.edges.entry(spec.name.clone()).or_default();
            for field in fields.iter().filter(|field| field.names.is_empty()) {
                match embedded_base_name(&field.ty) {
                    Some(name) => entry.push(name.to_string()),
                    None => warn!(
                        "{}: skipping embedded field of unsupported form in struct {}",
                        file.package, spec.name
                    ),
                }
            }
        }
        graph
    }

    pub fn embedded(&self, name: &str) -> &[String] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Union of two graphs. Lists for the same struct are concatenated.
    pub fn merge(&mut self, other: EmbeddingGraph) {
        for (name, embedded) in other.edges {
            self.edges.entry(name).or_default().extend(embedded);
        }
    }

    /// Every name reachable from `root`, breadth first. `root` itself is only
    /// included when a cycle leads back to it.
    pub fn closure(&self, root: &str) -> IndexSet<String> {
        let mut visited = IndexSet::new();
        let mut queue = VecDeque::from([root.to_string()]);
        while let Some(current) = queue.pop_front() {
            for embedded in self.embedded(&current) {
                if visited.insert(embedded.clone()) {
                    queue.push_back(embedded.clone());
                }
            }
        }
        visited
    }
}

/// Base identifier of an embedded field type: `T`, `*T`, `pkg.T` and `T[Args]`
/// all yield `T`.
pub fn embedded_base_name(ty: &TypeExpr) -> Option<&str> {
    match &ty.kind {
        TypeKind::Named { name, .. } => Some(name.as_str()),
        TypeKind::Pointer(inner) => embedded_base_name(inner),
        _ => None,
    }
}

pub fn scan_embedding_graph(src: &[u8]) -> Result<EmbeddingGraph, ParseError> {
    let parsed = ParsedFile::parse(src)?;
    Ok(EmbeddingGraph::from_file(&parsed.file))
}
