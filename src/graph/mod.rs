//! Graph model and builder for the crate.
//!
//! A [`DependencyGraph`] holds one [`GraphNode`] per collected source file, one
//! aggregated [`GraphEdge`] per ordered pair of files with at least one resolved
//! reference between them, the detected cycles, and a [`GraphSummary`].
//!
//! You typically construct a graph via `DependencyGraph::build_from_directory*`
//! and then hand it to a renderer, save it as JSON, or run `crate::query` over it.
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::ScanError;
use crate::language::Language;
use crate::parser::{DependencyExtractor, DependencyKind};
use crate::utils::file_walker::{self, SourceFile};

pub mod cycles;
pub mod resolver;

pub use resolver::{AliasTable, Resolver};

/// Display weight never exceeds this many references.
pub const MAX_EDGE_WEIGHT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub relative_path: String,
    pub language: Language,
    pub size: usize,
    pub lines: usize,
    pub group: u32,
    pub dependency_count: usize,
    pub dependent_count: usize,
    pub is_circular: bool,
}

impl GraphNode {
    #[must_use]
    pub fn from_source(file: &SourceFile) -> Self {
        let label = file.relative_path.rsplit('/').next().unwrap_or(&file.relative_path).to_string();
        Self {
            id: file.relative_path.clone(),
            label,
            relative_path: file.relative_path.clone(),
            language: file.language,
            size: file.content.len(),
            lines: file.content.split('\n').count(),
            group: file.language.group(),
            dependency_count: 0,
            dependent_count: 0,
            is_circular: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    /// Number of raw references collapsed into this edge.
    pub count: usize,
    /// `min(count, MAX_EDGE_WEIGHT)`, for presentation only.
    pub weight: usize,
    /// Kind of the first reference seen.
    pub kind: DependencyKind,
    pub title: String,
    pub is_circular: bool,
}

impl GraphEdge {
    #[must_use]
    pub fn new(from: String, to: String, kind: DependencyKind) -> Self {
        let mut edge =
            Self { from, to, count: 1, weight: 1, kind, title: String::new(), is_circular: false };
        edge.refresh_display();
        edge
    }

    fn add_occurrence(&mut self) {
        self.count += 1;
        self.refresh_display();
    }

    fn refresh_display(&mut self) {
        self.weight = self.count.min(MAX_EDGE_WEIGHT);
        let noun = if self.count == 1 { "reference" } else { "references" };
        self.title = format!("{} ({} {noun})", self.kind, self.count);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub languages: BTreeSet<Language>,
    pub cycle_count: usize,
    pub max_dependencies: usize,
    pub max_dependents: usize,
}

impl GraphSummary {
    #[must_use]
    pub fn compute(nodes: &[GraphNode], edges: &[GraphEdge], cycles: &[Vec<String>]) -> Self {
        Self {
            total_nodes: nodes.len(),
            total_edges: edges.len(),
            languages: nodes.iter().map(|n| n.language).collect(),
            cycle_count: cycles.len(),
            max_dependencies: nodes.iter().map(|n| n.dependency_count).max().unwrap_or(0),
            max_dependents: nodes.iter().map(|n| n.dependent_count).max().unwrap_or(0),
        }
    }
}

/// Knobs for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Run extraction and resolution on the rayon pool.
    pub parallel: bool,
    /// File name, relative to the root, holding path aliases.
    pub alias_config: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { parallel: true, alias_config: "tsconfig.json".to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub cycles: Vec<Vec<String>>,
    pub summary: GraphSummary,
}

impl DependencyGraph {
    /// Scan `path` with default options.
    ///
    /// # Errors
    /// Returns `ScanError` when the root or one of its directories cannot be traversed.
    pub fn build_from_directory(path: &Path) -> Result<Self, ScanError> {
        Self::build_from_directory_with_options(path, &ScanOptions::default())
    }

    /// Scan `path`: collect files, extract and resolve references, assemble
    /// edges and detect cycles.
    ///
    /// Unreadable files and a malformed alias file are logged and skipped; only
    /// traversal failures abort.
    ///
    /// # Errors
    /// Returns `ScanError` when the root or one of its directories cannot be traversed.
    pub fn build_from_directory_with_options(
        path: &Path,
        options: &ScanOptions,
    ) -> Result<Self, ScanError> {
        if !path.is_dir() {
            return Err(ScanError::NotADirectory(path.to_path_buf()));
        }
        let root = std::fs::canonicalize(path)?;
        debug!(root = %root.display(), "collecting source files");
        let files = file_walker::collect_source_files(&root)?;

        let aliases = match AliasTable::load(&root, &options.alias_config) {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, "ignoring path alias configuration");
                AliasTable::default()
            }
        };
        debug!(files = files.len(), aliases = aliases.entries().len(), "resolving dependencies");

        let graph = Self::from_source_files(&root, &files, aliases, options.parallel);
        info!(
            nodes = graph.summary.total_nodes,
            edges = graph.summary.total_edges,
            cycles = graph.summary.cycle_count,
            "scan completed"
        );
        Ok(graph)
    }

    /// Assemble the graph from already collected files.
    ///
    /// Output does not depend on `parallel`: per-file results are gathered in
    /// input order before any edge is created.
    #[must_use]
    pub fn from_source_files(
        root: &Path,
        files: &[SourceFile],
        aliases: AliasTable,
        parallel: bool,
    ) -> Self {
        let extractor = DependencyExtractor::new();
        let resolver = Resolver::new(root, aliases, files.iter().map(|f| f.relative_path.as_str()));

        let resolve_file = |file: &SourceFile| -> Vec<(String, DependencyKind)> {
            if !file.language.has_extractor() {
                return Vec::new();
            }
            extractor
                .extract_file(file)
                .into_iter()
                .filter_map(|r| resolver.resolve(file, &r).map(|to| (to, r.kind)))
                .collect()
        };
        let resolved: Vec<Vec<(String, DependencyKind)>> = if parallel {
            files.par_iter().map(&resolve_file).collect()
        } else {
            files.iter().map(&resolve_file).collect()
        };

        let mut nodes: Vec<GraphNode> = files.iter().map(GraphNode::from_source).collect();
        let mut edges: Vec<GraphEdge> = Vec::new();
        let mut edge_index: HashMap<(String, String), usize> = HashMap::new();
        for (file, targets) in files.iter().zip(resolved) {
            for (to, kind) in targets {
                if to == file.relative_path {
                    continue;
                }
                match edge_index.entry((file.relative_path.clone(), to)) {
                    Entry::Occupied(e) => edges[*e.get()].add_occurrence(),
                    Entry::Vacant(v) => {
                        let (from, to) = v.key().clone();
                        v.insert(edges.len());
                        edges.push(GraphEdge::new(from, to, kind));
                    }
                }
            }
        }

        let node_index: HashMap<String, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id.clone(), i)).collect();
        for edge in &edges {
            if let Some(&i) = node_index.get(&edge.from) {
                nodes[i].dependency_count += 1;
            }
            if let Some(&i) = node_index.get(&edge.to) {
                nodes[i].dependent_count += 1;
            }
        }

        let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let cycles = cycles::detect_cycles(&ids, &edges);
        cycles::mark_cycles(&mut nodes, &mut edges, &cycles);
        let summary = GraphSummary::compute(&nodes, &edges, &cycles);
        Self { nodes, edges, cycles, summary }
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn edge(&self, from: &str, to: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }

    /// Save the graph as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `ScanError` if serialization or writing the file fails.
    pub fn save_json(&self, path: &Path) -> Result<(), ScanError> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load a graph from JSON file.
    ///
    /// # Errors
    /// Returns `ScanError` if reading the file fails or JSON is invalid.
    pub fn load_json(path: &Path) -> Result<Self, ScanError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(rel: &str, language: Language, content: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from("/virtual").join(rel),
            relative_path: rel.to_string(),
            content: content.to_string(),
            language,
        }
    }

    #[test]
    fn node_fields_come_from_source_file() {
        let node = GraphNode::from_source(&file("src/app/main.py", Language::Python, "a\nb\n"));
        assert_eq!(node.id, "src/app/main.py");
        assert_eq!(node.label, "main.py");
        assert_eq!(node.size, 4);
        assert_eq!(node.lines, 3);
        assert_eq!(node.group, Language::Python.group());
        assert_eq!(node.dependency_count, 0);
        assert!(!node.is_circular);
    }

    #[test]
    fn edge_weight_is_capped_but_count_is_not() {
        let mut e = GraphEdge::new("a".into(), "b".into(), DependencyKind::Require);
        assert_eq!(e.title, "require (1 reference)");
        for _ in 0..6 {
            e.add_occurrence();
        }
        assert_eq!(e.count, 7);
        assert_eq!(e.weight, MAX_EDGE_WEIGHT);
        assert_eq!(e.title, "require (7 references)");
    }

    #[test]
    fn files_without_disk_presence_produce_no_edges() {
        // Paths under /virtual do not exist, so nothing resolves
        let files = vec![
            file("a.ts", Language::TypeScript, "import { b } from './b';\n"),
            file("b.ts", Language::TypeScript, "export const b = 1;\n"),
        ];
        let g = DependencyGraph::from_source_files(
            Path::new("/virtual"),
            &files,
            AliasTable::default(),
            false,
        );
        assert_eq!(g.nodes.len(), 2);
        assert!(g.edges.is_empty());
        assert!(g.cycles.is_empty());
        assert_eq!(g.summary.languages.len(), 1);
    }

    #[test]
    fn summary_of_empty_graph_is_zeroed() {
        let s = GraphSummary::compute(&[], &[], &[]);
        assert_eq!(s, GraphSummary::default());
    }

    #[test]
    fn json_uses_camel_case_fields() {
        let node = GraphNode::from_source(&file("x.go", Language::Go, ""));
        let v = serde_json::to_value(&node).unwrap();
        assert!(v.get("dependencyCount").is_some());
        assert!(v.get("isCircular").is_some());
        assert_eq!(v.get("language").and_then(|l| l.as_str()), Some("go"));
    }
}
