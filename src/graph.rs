use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use indexmap::IndexMap;
use log::{debug, info};

use crate::config::READ_BUFFER_SIZE;
use crate::error::{CommunityError, Result};

pub type VInt = u32;

/// Undirected weighted graph.
/// Vertices keep their insertion order, and so do the neighbors of each vertex.
/// Community detection breaks ties by this order, so two graphs holding the
/// same edges in a different order may end up with different communities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedGraph {
    pub(crate) adj_map: IndexMap<VInt, IndexMap<VInt, f64>>,
    pub(crate) e_size: u32,
    total_weight: f64,
}

impl WeightedGraph {
    pub fn new() -> WeightedGraph {
        // Create a new empty graph.
        WeightedGraph {
            adj_map: IndexMap::new(),
            e_size: 0u32,
            total_weight: 0.0,
        }
    }

    /// Build an unweighted graph from an edge list, every edge has weight 1.
    pub fn from_edges(edge_iter: impl IntoIterator<Item = (VInt, VInt)>) -> Self {
        Self::from_weighted_edges(edge_iter.into_iter().map(|(src, dst)| (src, dst, 1.0)))
    }

    /// Build a graph from a weighted edge list, a repeated edge keeps its last weight.
    pub fn from_weighted_edges(edge_iter: impl IntoIterator<Item = (VInt, VInt, f64)>) -> Self {
        let mut graph = WeightedGraph::new();
        for (src, dst, weight) in edge_iter {
            graph.add_edge(src, dst, weight);
        }
        graph
    }

    /// Insert an isolated vertex, return its position in the vertex order.
    pub fn add_node(&mut self, vertex: VInt) -> usize {
        let entry = self.adj_map.entry(vertex);
        let index = entry.index();
        entry.or_default();
        index
    }

    /// Insert the edge (src, dst), overwriting the weight of an existing one.
    pub fn add_edge(&mut self, src: VInt, dst: VInt, weight: f64) {
        self.add_node(src);
        self.add_node(dst);
        let previous = self.adj_map[&src].insert(dst, weight);
        if src != dst {
            self.adj_map[&dst].insert(src, weight);
        }
        match previous {
            Some(old_weight) => self.total_weight += weight - old_weight,
            None => {
                self.total_weight += weight;
                self.e_size += 1;
            }
        }
    }

    /// Add weight to the edge (src, dst), creating it when absent.
    pub fn accumulate_edge(&mut self, src: VInt, dst: VInt, weight: f64) {
        let sum = self.edge_weight(src, dst).unwrap_or(0.0) + weight;
        self.add_edge(src, dst, sum);
    }

    #[inline]
    pub fn contains_node(&self, vertex: &VInt) -> bool {
        self.adj_map.contains_key(vertex)
    }

    /// Weight of the edge (src, dst), `None` if there is no such edge.
    pub fn edge_weight(&self, src: VInt, dst: VInt) -> Option<f64> {
        self.adj_map.get(&src).and_then(|neighbors| neighbors.get(&dst)).copied()
    }

    /// Weight of the self-loop of a vertex, 0 if it has none.
    pub fn self_loop(&self, vertex: VInt) -> f64 {
        self.edge_weight(vertex, vertex).unwrap_or(0.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = VInt> + '_ {
        self.adj_map.keys().copied()
    }

    /// Neighbors of a vertex with the edge weights, self-loop included.
    pub fn neighbors(&self, vertex: VInt) -> impl Iterator<Item = (VInt, f64)> + '_ {
        self.adj_map
            .get(&vertex)
            .into_iter()
            .flat_map(|neighbors| neighbors.iter().map(|(v, w)| (*v, *w)))
    }

    /// Weighted degree, a self-loop counts twice.
    pub fn degree(&self, vertex: VInt) -> f64 {
        self.neighbors(vertex)
            .map(|(neighbor, weight)| if neighbor == vertex { 2.0 * weight } else { weight })
            .sum()
    }

    /// Every undirected edge once, as (src, dst, weight) where src comes first in vertex order.
    pub fn edges(&self) -> impl Iterator<Item = (VInt, VInt, f64)> + '_ {
        self.adj_map.iter().enumerate().flat_map(move |(index, (src, neighbors))| {
            neighbors
                .iter()
                .filter(move |(dst, _)| self.index_of(dst).map_or(false, |i| i >= index))
                .map(move |(dst, weight)| (*src, *dst, *weight))
        })
    }

    /// Sum of all edge weights, a self-loop counts once.
    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    #[inline]
    pub fn get_vertex_count(&self) -> usize {
        self.adj_map.len()
    }

    #[inline]
    pub fn get_edge_count(&self) -> usize {
        self.e_size as usize
    }

    #[inline]
    pub(crate) fn index_of(&self, vertex: &VInt) -> Option<usize> {
        self.adj_map.get_index_of(vertex)
    }

    /// Neighbor positions and weights of the vertex at `index`.
    pub(crate) fn neighbor_indices(&self, index: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adj_map
            .get_index(index)
            .into_iter()
            .flat_map(move |(_, neighbors)| {
                neighbors
                    .iter()
                    .filter_map(move |(v, w)| self.index_of(v).map(|i| (i, *w)))
            })
    }

    /// Load a graph from a .graph text file.
    /// The first line is a header, `v <id>` declares a vertex and
    /// `e <src> <dst> [weight]` an undirected edge.
    pub fn from_graph_file(file_path: impl AsRef<Path>) -> Result<Self> {
        let graph_file = File::open(file_path.as_ref())?;
        let graph_reader = BufReader::with_capacity(READ_BUFFER_SIZE, graph_file);
        let mut graph = WeightedGraph::new();
        for (line_no, line) in graph_reader.lines().enumerate() {
            let line = line?;
            if line_no == 0 {
                // The first line, just skip it.
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [] => continue,
                ["v", vid, ..] => {
                    graph.add_node(parse_token(vid, line_no)?);
                }
                ["e", src, dst] => {
                    graph.add_edge(parse_token(src, line_no)?, parse_token(dst, line_no)?, 1.0);
                }
                ["e", src, dst, weight] => {
                    let weight: f64 = parse_token(weight, line_no)?;
                    if !(weight >= 0.0) {
                        return Err(CommunityError::Format(
                            format!("line {}: negative edge weight", line_no + 1)));
                    }
                    graph.add_edge(parse_token(src, line_no)?, parse_token(dst, line_no)?, weight);
                }
                _ => {
                    return Err(CommunityError::Format(
                        format!("line {}: unexpected record '{}'", line_no + 1, line)));
                }
            }
        }
        info!("Load graph file: {} vertices, {} edges, total weight {}",
            graph.get_vertex_count(), graph.get_edge_count(), graph.total_weight());
        Ok(graph)
    }

    /// Load a binary graph as written by the `convert` tool of the C++ Louvain:
    /// a vertex count, the cumulative degree of every vertex, then the flat
    /// neighbor array, all little-endian u32. Every edge has weight 1.
    pub fn from_binary_file(file_path: impl AsRef<Path>) -> Result<Self> {
        let graph_file = File::open(file_path.as_ref())?;
        let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, graph_file);
        let graph = Self::from_binary_reader(&mut reader)?;
        info!("Load binary graph: {} vertices, {} edges",
            graph.get_vertex_count(), graph.get_edge_count());
        Ok(graph)
    }

    pub fn from_binary_reader(reader: &mut impl Read) -> Result<Self> {
        let v_size = reader.read_u32::<LittleEndian>()?;
        let mut cum_degree = vec![0u32; v_size as usize];
        reader.read_u32_into::<LittleEndian>(&mut cum_degree)?;
        let link_count = cum_degree.last().copied().unwrap_or(0);
        let mut links = vec![0u32; link_count as usize];
        reader.read_u32_into::<LittleEndian>(&mut links)?;

        let mut graph = WeightedGraph::new();
        for vertex in 0..v_size {
            graph.add_node(vertex);
        }
        let mut prev_degree = 0usize;
        for (vertex, last_degree) in cum_degree.iter().enumerate() {
            let last_degree = *last_degree as usize;
            if last_degree < prev_degree {
                return Err(CommunityError::Format(
                    format!("cumulative degree decreases at vertex {}", vertex)));
            }
            for neighbor in &links[prev_degree..last_degree] {
                if *neighbor >= v_size {
                    return Err(CommunityError::Format(
                        format!("vertex {} has unknown neighbor {}", vertex, neighbor)));
                }
                graph.add_edge(vertex as VInt, *neighbor, 1.0);
            }
            prev_degree = last_degree;
        }

        let mut trailing = [0u8; 1];
        match reader.read_exact(&mut trailing) {
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {}
            Err(e) => return Err(e.into()),
            Ok(()) => debug!("Ignore trailing bytes after the neighbor array"),
        }
        Ok(graph)
    }
}

fn parse_token<T: std::str::FromStr>(token: &str, line_no: usize) -> Result<T> {
    token.parse().map_err(|_| CommunityError::Format(
        format!("line {}: cannot parse '{}'", line_no + 1, token)))
}
