//! Directed cycle detection over the finished dependency graph.
//!
//! Cycles are found by back-edges during a depth-first traversal and
//! deduplicated by node membership: two cycles over the same set of files are
//! reported once, even when they visit those files in a different order.
use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::{GraphEdge, GraphNode};

struct CycleSearch<'a> {
    adj: Vec<Vec<usize>>,
    names: &'a [String],
    visited: Vec<bool>,
    on_stack: Vec<bool>,
    path: Vec<usize>,
    covered: Vec<bool>,
    seen: HashSet<String>,
    cycles: Vec<Vec<String>>,
}

impl CycleSearch<'_> {
    fn enter(&mut self, u: usize) {
        self.visited[u] = true;
        self.on_stack[u] = true;
        self.path.push(u);
    }

    // Explicit frame stack: (node, next successor index)
    fn dfs(&mut self, root: usize) {
        self.enter(root);
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(frame) = stack.last_mut() {
            let u = frame.0;
            if frame.1 < self.adj[u].len() {
                let v = self.adj[u][frame.1];
                frame.1 += 1;
                if !self.visited[v] {
                    self.enter(v);
                    stack.push((v, 0));
                } else if self.on_stack[v] {
                    // Back-edge closes the path slice starting at v
                    if let Some(pos) = self.path.iter().position(|&x| x == v) {
                        let cycle = self.path[pos..].to_vec();
                        self.record(&cycle);
                    }
                }
            } else {
                stack.pop();
                self.path.pop();
                self.on_stack[u] = false;
            }
        }
    }

    fn record(&mut self, cycle: &[usize]) {
        let mut key: Vec<&str> = cycle.iter().map(|&k| self.names[k].as_str()).collect();
        key.sort_unstable();
        if self.seen.insert(key.join("\n")) {
            for &k in cycle {
                self.covered[k] = true;
            }
            self.cycles.push(cycle.iter().map(|&k| self.names[k].clone()).collect());
        }
    }

    /// Shortest cycle through `start` that stays inside its component.
    fn cycle_through(&self, start: usize, comp: &[usize]) -> Option<Vec<usize>> {
        let mut parent: Vec<Option<usize>> = vec![None; self.adj.len()];
        parent[start] = Some(start);
        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            for &v in &self.adj[u] {
                if comp[v] != comp[start] {
                    continue;
                }
                if v == start {
                    let mut cycle = vec![u];
                    let mut cur = u;
                    while cur != start {
                        cur = parent[cur]?;
                        cycle.push(cur);
                    }
                    cycle.reverse();
                    return Some(cycle);
                }
                if parent[v].is_none() {
                    parent[v] = Some(u);
                    queue.push_back(v);
                }
            }
        }
        None
    }
}

/// Kosaraju component ids, one per node.
fn strongly_connected(adj: &[Vec<usize>]) -> Vec<usize> {
    let n = adj.len();
    let mut seen = vec![false; n];
    let mut order: Vec<usize> = Vec::with_capacity(n);
    for s in 0..n {
        if seen[s] {
            continue;
        }
        seen[s] = true;
        let mut stack: Vec<(usize, usize)> = vec![(s, 0)];
        while let Some(frame) = stack.last_mut() {
            let u = frame.0;
            if let Some(&v) = adj[u].get(frame.1) {
                frame.1 += 1;
                if !seen[v] {
                    seen[v] = true;
                    stack.push((v, 0));
                }
            } else {
                order.push(u);
                stack.pop();
            }
        }
    }

    let mut radj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (u, succ) in adj.iter().enumerate() {
        for &v in succ {
            radj[v].push(u);
        }
    }
    let mut comp = vec![usize::MAX; n];
    let mut next = 0;
    for &s in order.iter().rev() {
        if comp[s] != usize::MAX {
            continue;
        }
        comp[s] = next;
        let mut stack = vec![s];
        while let Some(u) = stack.pop() {
            for &v in &radj[u] {
                if comp[v] == usize::MAX {
                    comp[v] = next;
                    stack.push(v);
                }
            }
        }
        next += 1;
    }
    comp
}

/// Find cycles in the graph given by `node_ids` and `edges`.
///
/// Roots are tried in `node_ids` order and neighbours in edge order, so the
/// result is deterministic for a given graph. A single DFS pass can miss a
/// node whose only way back runs through an already finished node, so every
/// node in a multi-node strongly connected component that no DFS cycle covers
/// gets one extra cycle through it. Edges naming unknown nodes and self-loops
/// are ignored.
#[must_use]
pub fn detect_cycles(node_ids: &[String], edges: &[GraphEdge]) -> Vec<Vec<String>> {
    let index: HashMap<&str, usize> =
        node_ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); node_ids.len()];
    for edge in edges {
        if let (Some(&u), Some(&v)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str())) {
            if u != v {
                adj[u].push(v);
            }
        }
    }

    let n = node_ids.len();
    let mut search = CycleSearch {
        adj,
        names: node_ids,
        visited: vec![false; n],
        on_stack: vec![false; n],
        path: Vec::new(),
        covered: vec![false; n],
        seen: HashSet::new(),
        cycles: Vec::new(),
    };
    for u in 0..n {
        if !search.visited[u] {
            search.dfs(u);
        }
    }

    let comp = strongly_connected(&search.adj);
    let mut comp_size = vec![0usize; n];
    for &c in &comp {
        comp_size[c] += 1;
    }
    for u in 0..n {
        if search.covered[u] || comp_size[comp[u]] < 2 {
            continue;
        }
        if let Some(cycle) = search.cycle_through(u, &comp) {
            search.record(&cycle);
        }
    }
    search.cycles
}

/// Flag every node on a recorded cycle and every edge joining consecutive
/// cycle members (the last member wraps to the first).
pub fn mark_cycles(nodes: &mut [GraphNode], edges: &mut [GraphEdge], cycles: &[Vec<String>]) {
    let mut members: HashSet<&str> = HashSet::new();
    let mut links: HashSet<(&str, &str)> = HashSet::new();
    for cycle in cycles {
        for (i, from) in cycle.iter().enumerate() {
            let to = &cycle[(i + 1) % cycle.len()];
            members.insert(from.as_str());
            links.insert((from.as_str(), to.as_str()));
        }
    }
    for node in nodes.iter_mut() {
        node.is_circular = members.contains(node.id.as_str());
    }
    for edge in edges.iter_mut() {
        edge.is_circular = links.contains(&(edge.from.as_str(), edge.to.as_str()));
    }
}
