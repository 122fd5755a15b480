use std::fmt;
use std::fmt::{Display, Formatter};

use indexmap::IndexMap;

use crate::community::{CommID, Partition};
use crate::error::{CommunityError, Result};
use crate::graph::WeightedGraph;

/// Bookkeeping of one optimization level.
/// Vertices are addressed by their position in the graph, communities by a
/// dense id. A fresh status is built for every level, `clone` gives a deep copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub(crate) node2com: Vec<Option<CommID>>, // Community of each vertex, None while moving.
    pub(crate) gdegree: Vec<f64>, // Weighted degree of each vertex.
    pub(crate) loops: Vec<f64>, // Self-loop weight of each vertex.
    pub(crate) degree: Vec<f64>, // Sum of member degrees, one per community.
    pub(crate) internal: Vec<f64>, // Weight of the edges inside, one per community.
    pub(crate) total_weight: f64,
}

impl Status {
    /// Build the status of `graph`, every vertex alone in its community
    /// unless an initial partition is given.
    pub fn init(graph: &WeightedGraph, part: Option<&Partition>) -> Result<Status> {
        let v_size = graph.get_vertex_count();
        let mut status = Status {
            node2com: Vec::with_capacity(v_size),
            gdegree: Vec::with_capacity(v_size),
            loops: Vec::with_capacity(v_size),
            degree: Vec::with_capacity(v_size),
            internal: Vec::with_capacity(v_size),
            total_weight: graph.total_weight(),
        };
        match part {
            None => {
                for (count, vertex) in graph.nodes().enumerate() {
                    let deg = graph.degree(vertex);
                    let self_loop = graph.self_loop(vertex);
                    status.node2com.push(Some(count as CommID));
                    status.gdegree.push(deg);
                    status.loops.push(self_loop);
                    status.degree.push(deg);
                    status.internal.push(self_loop);
                }
            }
            Some(part) => {
                // Given ids may be anything, map them to dense ones.
                let mut dense_ids: IndexMap<CommID, CommID> = IndexMap::new();
                for vertex in graph.nodes() {
                    let given = *part.get(&vertex).ok_or(CommunityError::MissingNode(vertex))?;
                    let next = dense_ids.len() as CommID;
                    let com = *dense_ids.entry(given).or_insert(next);
                    if com == next {
                        status.degree.push(0.0);
                        status.internal.push(0.0);
                    }
                    let deg = graph.degree(vertex);
                    let mut inc = 0.0f64;
                    for (neighbor, weight) in graph.neighbors(vertex) {
                        let neighbor_com = *part.get(&neighbor).ok_or(CommunityError::MissingNode(neighbor))?;
                        if neighbor_com == given {
                            if neighbor == vertex {
                                inc += weight;
                            } else {
                                // Seen again from the other end.
                                inc += weight / 2.0;
                            }
                        }
                    }
                    status.node2com.push(Some(com));
                    status.gdegree.push(deg);
                    status.loops.push(graph.self_loop(vertex));
                    status.degree[com as usize] += deg;
                    status.internal[com as usize] += inc;
                }
            }
        }
        Ok(status)
    }

    /// Take the vertex at `node` out of `com`, `weight` being its edge weight into `com`.
    pub(crate) fn remove(&mut self, node: usize, com: CommID, weight: f64) {
        self.degree[com as usize] -= self.gdegree[node];
        self.internal[com as usize] -= weight + self.loops[node];
        self.node2com[node] = None;
    }

    /// Put the vertex at `node` into `com`, `weight` being its edge weight into `com`.
    pub(crate) fn insert(&mut self, node: usize, com: CommID, weight: f64) {
        self.node2com[node] = Some(com);
        self.degree[com as usize] += self.gdegree[node];
        self.internal[com as usize] += weight + self.loops[node];
    }

    #[inline]
    pub fn community_of(&self, node: usize) -> Option<CommID> {
        self.node2com.get(node).copied().flatten()
    }

    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Current assignment keyed by the vertices of `graph`, not renumbered.
    pub fn partition(&self, graph: &WeightedGraph) -> Partition {
        graph
            .nodes()
            .zip(self.node2com.iter())
            .filter_map(|(vertex, com)| com.map(|com| (vertex, com)))
            .collect()
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "node2com : {:?} degrees : {:?} internals : {:?} total_weight : {}",
               self.node2com, self.degree, self.internal, self.total_weight)
    }
}
