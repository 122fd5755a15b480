use std::collections::BTreeMap;

use fixedbitset::FixedBitSet;

use crate::community::{CommID, Partition};
use crate::error::{CommunityError, Result};
use crate::graph::WeightedGraph;
use crate::status::Status;

/// Compute the modularity of a partition of a graph (Newman & Girvan).
/// Every vertex of the graph must be in the partition, and the graph needs
/// at least one link of positive weight.
pub fn modularity(partition: &Partition, graph: &WeightedGraph) -> Result<f64> {
    let links = graph.total_weight();
    if links <= 0.0 {
        return Err(CommunityError::UndefinedModularity);
    }

    let mut inc: BTreeMap<CommID, f64> = BTreeMap::new();
    let mut deg: BTreeMap<CommID, f64> = BTreeMap::new();
    for vertex in graph.nodes() {
        let com = *partition.get(&vertex).ok_or(CommunityError::MissingNode(vertex))?;
        *deg.entry(com).or_insert(0.0) += graph.degree(vertex);
        for (neighbor, weight) in graph.neighbors(vertex) {
            let neighbor_com = *partition.get(&neighbor).ok_or(CommunityError::MissingNode(neighbor))?;
            if neighbor_com == com {
                let share = if neighbor == vertex { weight } else { weight / 2.0 };
                *inc.entry(com).or_insert(0.0) += share;
            }
        }
    }

    Ok(deg
        .iter()
        .map(|(com, degree)| {
            let internal = inc.get(com).copied().unwrap_or(0.0);
            internal / links - (degree / (2.0 * links)).powi(2)
        })
        .sum())
}

impl Status {
    /// Modularity of the current assignment, from the aggregates only.
    /// A graph without weight scores 0.
    pub fn modularity(&self) -> f64 {
        let links = self.total_weight;
        if links <= 0.0 {
            return 0.0;
        }
        let mut seen = FixedBitSet::with_capacity(self.degree.len());
        let mut res = 0.0f64;
        for com in self.node2com.iter().flatten() {
            let com = *com as usize;
            if seen.put(com) {
                continue;
            }
            res += self.internal[com] / links - (self.degree[com] / (2.0 * links)).powi(2);
        }
        res
    }
}

#[cfg(test)]
mod test_modularity {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::community::Partition;
    use crate::error::CommunityError;
    use crate::graph::{VInt, WeightedGraph};
    use crate::modularity::modularity;
    use crate::status::Status;

    fn complete_graph(n: VInt) -> WeightedGraph {
        let mut g = WeightedGraph::new();
        for u in 0..n {
            for v in (u + 1)..n {
                g.add_edge(u, v, 1.0);
            }
        }
        g
    }

    fn assert_relative(a: f64, b: f64) {
        let scale = a.abs().max(b.abs()).max(1.0);
        assert!((a - b).abs() <= 1e-9 * scale, "{} != {}", a, b);
    }

    #[test]
    fn test_complete_graph_two_halves() {
        let g = complete_graph(4);
        let partition: Partition = [(0, 10), (1, 10), (2, 20), (3, 20)].into_iter().collect();
        let q = modularity(&partition, &g).unwrap();
        assert_relative(q, -1.0 / 6.0);
        assert!((q + 0.1667).abs() < 1e-4);
    }

    #[test]
    fn test_single_community_is_zero() {
        let g = complete_graph(6);
        let partition: Partition = g.nodes().map(|v| (v, 0)).collect();
        assert_relative(modularity(&partition, &g).unwrap(), 0.0);
    }

    #[test]
    fn test_self_loops_count_once() {
        // One vertex with a self-loop holds all the weight.
        let mut g = WeightedGraph::new();
        g.add_edge(0, 0, 2.0);
        g.add_node(1);
        let partition: Partition = [(0, 0), (1, 1)].into_iter().collect();
        assert_relative(modularity(&partition, &g).unwrap(), 0.0);
    }

    #[test]
    fn test_undefined_modularity() {
        let mut g = WeightedGraph::new();
        g.add_node(0);
        g.add_node(1);
        let partition: Partition = [(0, 0), (1, 0)].into_iter().collect();
        assert!(matches!(modularity(&partition, &g), Err(CommunityError::UndefinedModularity)));

        let empty = WeightedGraph::new();
        assert!(matches!(modularity(&Partition::new(), &empty), Err(CommunityError::UndefinedModularity)));
    }

    #[test]
    fn test_missing_vertex() {
        let g = complete_graph(3);
        let partition: Partition = [(0, 0), (1, 0)].into_iter().collect();
        assert!(matches!(modularity(&partition, &g), Err(CommunityError::MissingNode(2))));
    }

    #[test]
    fn test_fast_and_direct_agree() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut g = WeightedGraph::new();
            for v in 0..30 {
                g.add_node(v);
            }
            for u in 0..30 {
                for v in u..30 {
                    if rng.gen_bool(0.15) {
                        g.add_edge(u, v, rng.gen_range(0.1..5.0));
                    }
                }
            }
            g.add_edge(0, 1, 1.0);
            let partition: Partition = g.nodes().map(|v| (v, rng.gen_range(0..5))).collect();
            let direct = modularity(&partition, &g).unwrap();
            let status = Status::init(&g, Some(&partition)).unwrap();
            assert_relative(status.modularity(), direct);
        }
    }

    #[test]
    fn test_fast_form_singletons() {
        // Single edge, each end alone: 0 - 2 * (1/2)^2.
        let g = WeightedGraph::from_edges(vec![(0, 1)]);
        let status = Status::init(&g, None).unwrap();
        assert_relative(status.modularity(), -0.5);
        let partition: Partition = [(0, 0), (1, 1)].into_iter().collect();
        assert_relative(modularity(&partition, &g).unwrap(), -0.5);
    }

    #[test]
    fn test_fast_form_without_weight() {
        let mut g = WeightedGraph::new();
        g.add_node(3);
        let status = Status::init(&g, None).unwrap();
        assert_eq!(status.modularity(), 0.0);
    }
}
