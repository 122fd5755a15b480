use thiserror::Error;

use crate::graph::VInt;

pub type Result<T> = std::result::Result<T, CommunityError>;

/// Errors surfaced by graph loading and community detection.
#[derive(Debug, Error)]
pub enum CommunityError {
    #[error("a graph without link has an undefined modularity")]
    UndefinedModularity,

    #[error("node {0} is missing from the partition")]
    MissingNode(VInt),

    #[error("level {level} is out of range, the dendrogram has {len} levels")]
    LevelOutOfRange { level: usize, len: usize },

    #[error("community {community} of level {level} is not a node of the next level")]
    BrokenDendrogram { level: usize, community: u32 },

    #[error("bad graph file: {0}")]
    Format(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
