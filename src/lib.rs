//! polyglot-depgraph — file-level dependency graphs for mixed-language source trees
//!
//! Scan a project directory, extract import/include/use statements with
//! per-language lexical patterns, resolve them to files inside the project and
//! assemble a weighted, cycle-annotated dependency graph.
//!
//! # Features
//! - File discovery with a fixed directory ignore-list (`node_modules`, `.git`, `dist`, ...)
//! - Extraction for TypeScript/JavaScript, Python, Java, C#, C/C++, Go and Rust
//! - `tsconfig.json` path aliases
//! - Aggregated edges, dependency/dependent counts, cycle detection and a summary
//! - Queries: connected files, hubs, shortest path
//!
//! # Quickstart (Library)
//! ```no_run
//! use polyglot_depgraph::graph::DependencyGraph;
//!
//! let graph = DependencyGraph::build_from_directory(std::path::Path::new("."))
//!     .expect("scan project");
//! println!("files: {} edges: {} cycles: {}",
//!     graph.summary.total_nodes, graph.summary.total_edges, graph.summary.cycle_count);
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! polyglot-depgraph scan --path . --json graph.json
//! polyglot-depgraph query cycles --graph graph.json --format json
//! ```
//!
//! Extraction is lexical: commented-out imports still match, and a dependency
//! that only resolves by file name may bind to a same-named file elsewhere.
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod language;
pub mod parser;
pub mod query;
pub mod utils;
