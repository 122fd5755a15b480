//! Community detection by modularity optimization with the Louvain heuristic
//! (Blondel et al., Fast unfolding of communities in large networks, 2008).
//!
//! ```
//! use louvain_community::{best_partition, modularity, LouvainConfig, WeightedGraph};
//!
//! let graph = WeightedGraph::from_edges(vec![(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3)]);
//! let partition = best_partition(&graph, None, &LouvainConfig::default()).unwrap();
//! assert_eq!(partition[&0], partition[&2]);
//! assert_ne!(partition[&0], partition[&4]);
//! assert!(modularity(&partition, &graph).unwrap() > 0.3);
//! ```

pub mod community;
pub mod config;
pub mod dendrogram;
pub mod error;
pub mod graph;
pub mod induce;
pub mod logger;
pub mod modularity;
pub mod optimizer;
pub mod status;

pub use community::{renumber, CommID, Partition};
pub use config::{LouvainConfig, Settings};
pub use dendrogram::{best_partition, generate_dendrogram, Dendrogram};
pub use error::{CommunityError, Result};
pub use graph::{VInt, WeightedGraph};
pub use induce::induced_graph;
pub use modularity::modularity;
pub use optimizer::one_level;
pub use status::Status;
