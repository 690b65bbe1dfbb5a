use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::graph::DependencyGraph;

/// Query trait implemented by all query types.
///
/// Given an immutable reference to a `DependencyGraph`, returns a result of type `R`.
pub trait Query<R> {
    fn run(&self, graph: &DependencyGraph) -> R;
}

/// Which side of a file's edges `ConnectedFilesQuery` follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Files the target depends on.
    Dependencies,
    /// Files depending on the target.
    Dependents,
    Both,
}

/// Files directly connected to one node, sorted by id.
pub struct ConnectedFilesQuery {
    pub file: String,
    pub direction: Direction,
}

impl ConnectedFilesQuery {
    #[must_use]
    pub fn new(file: &str, direction: Direction) -> Self {
        Self { file: file.trim_start_matches("./").replace('\\', "/"), direction }
    }
}

impl Query<Vec<String>> for ConnectedFilesQuery {
    fn run(&self, graph: &DependencyGraph) -> Vec<String> {
        let mut out: BTreeSet<String> = BTreeSet::new();
        for edge in &graph.edges {
            let outgoing = matches!(self.direction, Direction::Dependencies | Direction::Both);
            let incoming = matches!(self.direction, Direction::Dependents | Direction::Both);
            if outgoing && edge.from == self.file {
                out.insert(edge.to.clone());
            }
            if incoming && edge.to == self.file {
                out.insert(edge.from.clone());
            }
        }
        out.into_iter().collect()
    }
}

/// Metric for degree centrality used by `HubsQuery`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentralityMetric {
    In,
    Out,
    Total,
}

/// Compute top-N files by degree centrality.
///
/// Rows are `(id, dependents, dependencies)`.
pub struct HubsQuery {
    pub metric: CentralityMetric,
    pub top: usize,
}

impl HubsQuery {
    /// Create a hubs query for the given metric and number of results.
    #[must_use]
    pub fn new(metric: CentralityMetric, top: usize) -> Self {
        Self { metric, top }
    }

    fn key(&self, indeg: usize, outdeg: usize) -> usize {
        match self.metric {
            CentralityMetric::In => indeg,
            CentralityMetric::Out => outdeg,
            CentralityMetric::Total => indeg + outdeg,
        }
    }
}

impl Query<Vec<(String, usize, usize)>> for HubsQuery {
    fn run(&self, graph: &DependencyGraph) -> Vec<(String, usize, usize)> {
        let mut rows: Vec<(String, usize, usize)> = graph
            .nodes
            .iter()
            .map(|n| (n.id.clone(), n.dependent_count, n.dependency_count))
            .collect();
        // Sort by chosen metric desc, then by id asc for stability
        rows.sort_by(|a, b| self.key(b.1, b.2).cmp(&self.key(a.1, a.2)).then_with(|| a.0.cmp(&b.0)));
        rows.truncate(self.top);
        rows
    }
}

/// Compute shortest path between two files (directed edges).
pub struct ShortestPathQuery {
    pub from: String,
    pub to: String,
}

impl ShortestPathQuery {
    #[must_use]
    pub fn new(from: &str, to: &str) -> Self {
        Self { from: from.to_string(), to: to.to_string() }
    }
}

impl Query<Vec<String>> for ShortestPathQuery {
    fn run(&self, graph: &DependencyGraph) -> Vec<String> {
        let idx: HashMap<&str, usize> =
            graph.nodes.iter().enumerate().map(|(i, n)| (n.id.as_str(), i)).collect();
        let (Some(&src), Some(&dst)) = (idx.get(self.from.as_str()), idx.get(self.to.as_str()))
        else {
            return Vec::new();
        };

        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); graph.nodes.len()];
        for edge in &graph.edges {
            if let (Some(&u), Some(&v)) = (idx.get(edge.from.as_str()), idx.get(edge.to.as_str())) {
                adj[u].push(v);
            }
        }

        // BFS
        let mut prev: Vec<Option<usize>> = vec![None; graph.nodes.len()];
        let mut visited = vec![false; graph.nodes.len()];
        let mut q: VecDeque<usize> = VecDeque::new();
        visited[src] = true;
        q.push_back(src);
        while let Some(u) = q.pop_front() {
            if u == dst {
                break;
            }
            for &v in &adj[u] {
                if !visited[v] {
                    visited[v] = true;
                    prev[v] = Some(u);
                    q.push_back(v);
                }
            }
        }
        if !visited[dst] {
            return Vec::new();
        }

        let mut path_indices = vec![dst];
        let mut cur = dst;
        while let Some(p) = prev[cur] {
            path_indices.push(p);
            cur = p;
        }
        path_indices.reverse();
        path_indices.into_iter().map(|i| graph.nodes[i].id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphEdge, GraphNode, GraphSummary};
    use crate::language::Language;
    use crate::parser::DependencyKind;

    fn node(id: &str, deps: usize, dependents: usize) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            label: id.to_string(),
            relative_path: id.to_string(),
            language: Language::TypeScript,
            size: 0,
            lines: 1,
            group: Language::TypeScript.group(),
            dependency_count: deps,
            dependent_count: dependents,
            is_circular: false,
        }
    }

    // a -> b -> c, a -> c, d isolated
    fn graph_fixture() -> DependencyGraph {
        let nodes = vec![node("a", 2, 0), node("b", 1, 1), node("c", 0, 2), node("d", 0, 0)];
        let edges = vec![
            GraphEdge::new("a".into(), "b".into(), DependencyKind::Import),
            GraphEdge::new("b".into(), "c".into(), DependencyKind::Import),
            GraphEdge::new("a".into(), "c".into(), DependencyKind::Require),
        ];
        let summary = GraphSummary::compute(&nodes, &edges, &[]);
        DependencyGraph { nodes, edges, cycles: Vec::new(), summary }
    }

    #[test]
    fn connected_files_by_direction() {
        let g = graph_fixture();
        assert_eq!(ConnectedFilesQuery::new("b", Direction::Dependencies).run(&g), vec!["c"]);
        assert_eq!(ConnectedFilesQuery::new("b", Direction::Dependents).run(&g), vec!["a"]);
        assert_eq!(ConnectedFilesQuery::new("./b", Direction::Both).run(&g), vec!["a", "c"]);
        assert!(ConnectedFilesQuery::new("d", Direction::Both).run(&g).is_empty());
    }

    #[test]
    fn hubs_sorted_by_metric_then_id() {
        let g = graph_fixture();
        let top = HubsQuery::new(CentralityMetric::In, 2).run(&g);
        assert_eq!(top[0], ("c".to_string(), 2, 0));
        assert_eq!(top[1], ("b".to_string(), 1, 1));
        let total = HubsQuery::new(CentralityMetric::Total, 10).run(&g);
        let ids: Vec<&str> = total.iter().map(|r| r.0.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn shortest_path_prefers_direct_edge() {
        let g = graph_fixture();
        assert_eq!(ShortestPathQuery::new("a", "c").run(&g), vec!["a", "c"]);
        assert_eq!(ShortestPathQuery::new("b", "c").run(&g), vec!["b", "c"]);
        assert!(ShortestPathQuery::new("c", "a").run(&g).is_empty());
        assert!(ShortestPathQuery::new("a", "zzz").run(&g).is_empty());
    }
}
