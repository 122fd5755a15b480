use crate::community::Partition;
use crate::error::{CommunityError, Result};
use crate::graph::WeightedGraph;

/// Produce the graph whose vertices are the communities of `partition`.
/// Two communities are linked by the summed weight of the edges between their
/// members, the edges inside a community become its self-loop.
pub fn induced_graph(partition: &Partition, graph: &WeightedGraph) -> Result<WeightedGraph> {
    let mut induced = WeightedGraph::new();
    for comm_id in partition.values() {
        induced.add_node(*comm_id);
    }
    for (src, dst, weight) in graph.edges() {
        let src_com = *partition.get(&src).ok_or(CommunityError::MissingNode(src))?;
        let dst_com = *partition.get(&dst).ok_or(CommunityError::MissingNode(dst))?;
        induced.accumulate_edge(src_com, dst_com, weight);
    }
    Ok(induced)
}
