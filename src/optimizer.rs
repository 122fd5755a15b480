use indexmap::IndexMap;
use log::trace;

use crate::community::CommID;
use crate::config::MIN_GAIN;
use crate::graph::WeightedGraph;
use crate::status::Status;

/// Weight from the vertex at `node` to each neighboring community,
/// communities in order of discovery, self-loop left out.
fn neighcom(node: usize, graph: &WeightedGraph, status: &Status) -> IndexMap<CommID, f64> {
    let mut weights: IndexMap<CommID, f64> = IndexMap::new();
    for (neighbor, weight) in graph.neighbor_indices(node) {
        if neighbor == node {
            continue;
        }
        if let Some(neighbor_com) = status.community_of(neighbor) {
            *weights.entry(neighbor_com).or_insert(0.0) += weight;
        }
    }
    weights
}

/// Compute one level of communities: sweep the vertices in graph order and
/// move each one to the neighboring community with the best modularity gain,
/// until a sweep moves nothing, `pass_max` sweeps are done, or a sweep gains
/// less than `MIN_GAIN`. Return the number of sweeps.
pub fn one_level(graph: &WeightedGraph, status: &mut Status, pass_max: Option<usize>) -> usize {
    if status.total_weight <= 0.0 {
        // Nothing to gain without links.
        return 0;
    }
    let mut modified = true;
    let mut pass_done = 0usize;
    let mut new_mod = status.modularity();

    while modified && pass_max.map_or(true, |max| pass_done < max) {
        let cur_mod = new_mod;
        modified = false;
        pass_done += 1;
        let mut moves = 0usize;

        for node in 0..graph.get_vertex_count() {
            let Some(com_node) = status.community_of(node) else {
                continue;
            };
            let degc_totw = status.gdegree[node] / (status.total_weight * 2.0);
            let neigh_communities = neighcom(node, graph, status);
            status.remove(node, com_node, neigh_communities.get(&com_node).copied().unwrap_or(0.0));

            let mut best_com = com_node;
            let mut best_increase = 0.0f64;
            for (com, dnc) in &neigh_communities {
                let incr = dnc - status.degree[*com as usize] * degc_totw;
                if incr > best_increase {
                    best_increase = incr;
                    best_com = *com;
                }
            }
            status.insert(node, best_com, neigh_communities.get(&best_com).copied().unwrap_or(0.0));
            if best_com != com_node {
                modified = true;
                moves += 1;
            }
        }

        new_mod = status.modularity();
        trace!("Pass {}: {} moves, modularity {} -> {}", pass_done, moves, cur_mod, new_mod);
        if new_mod - cur_mod < MIN_GAIN {
            break;
        }
    }
    pass_done
}
