use polyglot_depgraph::graph::DependencyGraph;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::fs;

// (from, to, repetitions), indices taken modulo the file count
fn import_sets() -> impl Strategy<Value = (usize, Vec<(usize, usize, usize)>)> {
    (1usize..7, prop::collection::vec((0usize..7, 0usize..7, 1usize..8), 0..16))
}

fn name(i: usize) -> String {
    format!("f{i}.ts")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // Generated TypeScript projects: edges, counts, cycle flags and rescans
    #[test]
    fn generated_projects_keep_graph_invariants((n, raw) in import_sets()) {
        let dir = tempfile::tempdir().unwrap();
        let mut bodies = vec![String::new(); n];
        let mut expected: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        for (from, to, reps) in raw {
            let (from, to) = (from % n, to % n);
            for _ in 0..reps {
                bodies[from].push_str(&format!("import {{ x }} from './f{to}';\n"));
            }
            if from != to {
                *expected.entry((from, to)).or_default() += reps;
            }
        }
        for (i, body) in bodies.iter().enumerate() {
            fs::write(dir.path().join(name(i)), body).unwrap();
        }

        let g = DependencyGraph::build_from_directory(dir.path()).unwrap();
        prop_assert_eq!(g.nodes.len(), n);
        prop_assert_eq!(g.edges.len(), expected.len());
        for (&(from, to), &count) in &expected {
            let e = g.edge(&name(from), &name(to));
            prop_assert!(e.is_some());
            let e = e.unwrap();
            prop_assert_eq!(e.count, count);
            prop_assert_eq!(e.weight, count.min(5));
        }
        let deps: usize = g.nodes.iter().map(|x| x.dependency_count).sum();
        let dependents: usize = g.nodes.iter().map(|x| x.dependent_count).sum();
        prop_assert_eq!(deps, g.edges.len());
        prop_assert_eq!(dependents, g.edges.len());

        // Transitive closure over the expected edge set
        let mut reach = vec![vec![false; n]; n];
        for &(from, to) in expected.keys() {
            reach[from][to] = true;
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    if reach[i][k] && reach[k][j] {
                        reach[i][j] = true;
                    }
                }
            }
        }
        for i in 0..n {
            let on_cycle = (0..n).any(|j| j != i && reach[i][j] && reach[j][i]);
            let node = g.node(&name(i)).unwrap();
            prop_assert_eq!(node.is_circular, on_cycle, "flag mismatch for {}", name(i));
        }

        let mut node_sets = HashSet::new();
        for cycle in &g.cycles {
            prop_assert!(cycle.len() >= 2);
            for (k, from) in cycle.iter().enumerate() {
                let to = &cycle[(k + 1) % cycle.len()];
                prop_assert!(g.edge(from, to).map_or(false, |e| e.is_circular));
            }
            let mut key = cycle.clone();
            key.sort();
            prop_assert!(node_sets.insert(key), "duplicate cycle node set");
        }

        let again = DependencyGraph::build_from_directory(dir.path()).unwrap();
        prop_assert_eq!(again, g);
    }
}
