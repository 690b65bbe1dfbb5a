use crate::cli::{Cli, Commands, DirectionArg, GraphSource, MetricArg, OutputFormat, QueryCommands};
use crate::graph::{DependencyGraph, ScanOptions};
use crate::query::{
    CentralityMetric, ConnectedFilesQuery, Direction, HubsQuery, Query, ShortestPathQuery,
};
use crate::utils::config::{self, Config};
use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use std::io;

/// Run the CLI logic in-process.
///
/// Returns an exit code: 0 on success, 1 when a scan or load fails, 2 on bad input.
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let bin_name = env!("CARGO_PKG_NAME");
            generate(shell, &mut cmd, bin_name, &mut io::stdout());
            0
        }
        Commands::Scan { source, json } => {
            let Some((graph, _)) = load_graph(&source) else {
                return 1;
            };
            if let Some(json_path) = json {
                if let Err(e) = graph.save_json(&json_path) {
                    eprintln!("Failed to write JSON output {}: {e}", json_path.display());
                    return 1;
                }
            }
            if !cli.quiet {
                let s = &graph.summary;
                println!(
                    "Scan completed for path: {} ({} files, {} edges, {} cycles)",
                    source.path.display(),
                    s.total_nodes,
                    s.total_edges,
                    s.cycle_count
                );
            }
            0
        }
        Commands::Summary { source, format } => {
            let Some((graph, cfg)) = load_graph(&source) else {
                return 1;
            };
            let s = &graph.summary;
            if resolve_format(format, cfg.as_ref()) == OutputFormat::Json {
                return print_json(s);
            }
            let languages: Vec<&str> = s.languages.iter().map(|l| l.as_str()).collect();
            let rows = vec![
                vec!["files".to_string(), s.total_nodes.to_string()],
                vec!["edges".to_string(), s.total_edges.to_string()],
                vec!["languages".to_string(), languages.join(", ")],
                vec!["cycles".to_string(), s.cycle_count.to_string()],
                vec!["max dependencies".to_string(), s.max_dependencies.to_string()],
                vec!["max dependents".to_string(), s.max_dependents.to_string()],
            ];
            println!("{}", crate::utils::table::render(&["Metric", "Value"], &rows));
            0
        }
        Commands::Query { query } => run_query(query),
    }
}

fn run_query(query: QueryCommands) -> i32 {
    match query {
        QueryCommands::Cycles { source, format } => {
            let Some((graph, cfg)) = load_graph(&source) else {
                return 1;
            };
            if resolve_format(format, cfg.as_ref()) == OutputFormat::Json {
                return print_json(&graph.cycles);
            }
            if graph.cycles.is_empty() {
                println!("No cycles found");
                return 0;
            }
            let rows: Vec<Vec<String>> = graph
                .cycles
                .iter()
                .enumerate()
                .map(|(i, c)| vec![format!("{}", i + 1), c.len().to_string(), c.join(" -> ")])
                .collect();
            println!("{}", crate::utils::table::render(&["#", "Files", "Cycle"], &rows));
            0
        }
        QueryCommands::Connected { source, file, direction, format } => {
            let Some((graph, cfg)) = load_graph(&source) else {
                return 1;
            };
            let q = ConnectedFilesQuery::new(&file, direction.into());
            if graph.node(&q.file).is_none() {
                eprintln!("Unknown file: {file}");
                return 2;
            }
            let results = q.run(&graph);
            print_paths(&results, resolve_format(format, cfg.as_ref()))
        }
        QueryCommands::Hubs { source, metric, top, format } => {
            let Some((graph, cfg)) = load_graph(&source) else {
                return 1;
            };
            let rows = HubsQuery::new(metric.into(), top).run(&graph);
            if resolve_format(format, cfg.as_ref()) == OutputFormat::Json {
                #[derive(Serialize)]
                struct Row<'a> {
                    file: &'a str,
                    dependents: usize,
                    dependencies: usize,
                }
                let out: Vec<Row<'_>> = rows
                    .iter()
                    .map(|(f, i, o)| Row { file: f, dependents: *i, dependencies: *o })
                    .collect();
                return print_json(&out);
            }
            let table_rows: Vec<Vec<String>> = rows
                .iter()
                .map(|(f, i, o)| vec![f.clone(), i.to_string(), o.to_string()])
                .collect();
            println!(
                "{}",
                crate::utils::table::render(&["File", "Dependents", "Dependencies"], &table_rows)
            );
            0
        }
        QueryCommands::Path { source, from, to, format } => {
            let Some((graph, cfg)) = load_graph(&source) else {
                return 1;
            };
            for f in [&from, &to] {
                if graph.node(f).is_none() {
                    eprintln!("Unknown file: {f}");
                    return 2;
                }
            }
            let path = ShortestPathQuery::new(&from, &to).run(&graph);
            print_paths(&path, resolve_format(format, cfg.as_ref()))
        }
    }
}

impl From<DirectionArg> for Direction {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Dependencies => Self::Dependencies,
            DirectionArg::Dependents => Self::Dependents,
            DirectionArg::Both => Self::Both,
        }
    }
}

impl From<MetricArg> for CentralityMetric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::In => Self::In,
            MetricArg::Out => Self::Out,
            MetricArg::Total => Self::Total,
        }
    }
}

// Saved graph when --graph is given, otherwise a fresh scan of --path
fn load_graph(source: &GraphSource) -> Option<(DependencyGraph, Option<Config>)> {
    let cfg = match source.config.as_ref() {
        Some(p) => config::load_config_at(p),
        None => config::load_config_near(&source.path),
    };
    if let Some(p) = source.graph.as_ref() {
        return match DependencyGraph::load_json(p) {
            Ok(g) => Some((g, cfg)),
            Err(e) => {
                eprintln!("Load graph failed: {e}");
                None
            }
        };
    }
    let mut options = cfg.as_ref().map_or_else(ScanOptions::default, |c| c.scan_options(ScanOptions::default()));
    if source.no_parallel {
        options.parallel = false;
    }
    match DependencyGraph::build_from_directory_with_options(&source.path, &options) {
        Ok(g) => Some((g, cfg)),
        Err(e) => {
            eprintln!("Scan failed: {e}");
            None
        }
    }
}

// Explicit flag wins, then [query].default_format, then text
fn resolve_format(flag: Option<OutputFormat>, cfg: Option<&Config>) -> OutputFormat {
    if let Some(f) = flag {
        return f;
    }
    match cfg.and_then(Config::default_format) {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{s}");
            0
        }
        Err(e) => {
            eprintln!("JSON encode error: {e}");
            1
        }
    }
}

fn print_paths(paths: &[String], format: OutputFormat) -> i32 {
    if format == OutputFormat::Json {
        return print_json(paths);
    }
    let rows: Vec<Vec<String>> =
        paths.iter().enumerate().map(|(i, p)| vec![format!("{}", i + 1), p.clone()]).collect();
    println!("{}", crate::utils::table::render(&["#", "Path"], &rows));
    0
}
