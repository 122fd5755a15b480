use std::time::Instant;

use log::{debug, info};
use serde::Serialize;

use crate::community::{community_count, renumber, Partition};
use crate::config::{LouvainConfig, MIN_GAIN};
use crate::error::{CommunityError, Result};
use crate::graph::WeightedGraph;
use crate::induce::induced_graph;
use crate::optimizer::one_level;
use crate::status::Status;

/// Successive partitions found by the Louvain heuristic.
/// Level 0 maps the graph vertices to the smallest communities, the vertices
/// of level i + 1 are the communities of level i, and the last level is the
/// partition of highest modularity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dendrogram {
    levels: Vec<Partition>,
}

impl Dendrogram {
    pub fn from_levels(levels: Vec<Partition>) -> Self {
        Dendrogram { levels }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[Partition] {
        &self.levels
    }

    pub fn level(&self, level: usize) -> Option<&Partition> {
        self.levels.get(level)
    }

    pub fn community_count(&self, level: usize) -> Option<usize> {
        self.levels.get(level).map(community_count)
    }

    /// Partition of the graph vertices at `level`, composing levels 0 to `level`.
    pub fn partition_at_level(&self, level: usize) -> Result<Partition> {
        let mut partition = self
            .levels
            .first()
            .filter(|_| level < self.levels.len())
            .cloned()
            .ok_or(CommunityError::LevelOutOfRange { level, len: self.levels.len() })?;
        for index in 1..=level {
            let next = &self.levels[index];
            for community in partition.values_mut() {
                let key = *community;
                *community = *next.get(&key).ok_or(CommunityError::BrokenDendrogram {
                    level: index - 1,
                    community: key,
                })?;
            }
        }
        Ok(partition)
    }

    /// Partition of the graph vertices at the last level.
    pub fn best_partition(&self) -> Result<Partition> {
        self.partition_at_level(self.levels.len().saturating_sub(1))
    }
}

/// Find the communities of `graph` and return the associated dendrogram.
/// The search starts from `part_init` when given, from singletons otherwise.
pub fn generate_dendrogram(
    graph: &WeightedGraph,
    part_init: Option<&Partition>,
    config: &LouvainConfig,
) -> Result<Dendrogram> {
    let start = Instant::now();
    let mut status = Status::init(graph, part_init)?;
    let passes = one_level(graph, &mut status, config.pass_max);
    let mut modularity = status.modularity();
    let partition = renumber(&status.partition(graph));
    info!("Level 0: {} vertices, {} communities, {} passes, modularity {}",
        graph.get_vertex_count(), community_count(&partition), passes, modularity);

    let mut current_graph = induced_graph(&partition, graph)?;
    let mut levels = vec![partition];
    loop {
        status = Status::init(&current_graph, None)?;
        let passes = one_level(&current_graph, &mut status, config.pass_max);
        let new_mod = status.modularity();
        if new_mod - modularity < MIN_GAIN {
            debug!("Stop at level {}, modularity gain {}", levels.len(), new_mod - modularity);
            break;
        }
        let partition = renumber(&status.partition(&current_graph));
        info!("Level {}: {} vertices, {} communities, {} passes, modularity {}",
            levels.len(), current_graph.get_vertex_count(), community_count(&partition), passes, new_mod);
        current_graph = induced_graph(&partition, &current_graph)?;
        levels.push(partition);
        modularity = new_mod;
    }
    info!("Dendrogram of {} levels built in {:?}", levels.len(), start.elapsed());
    Ok(Dendrogram { levels })
}

/// Partition of the graph vertices maximising the modularity (or trying to),
/// the last level of the dendrogram.
pub fn best_partition(
    graph: &WeightedGraph,
    partition: Option<&Partition>,
    config: &LouvainConfig,
) -> Result<Partition> {
    generate_dendrogram(graph, partition, config)?.best_partition()
}
