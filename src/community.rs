use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::error::{CommunityError, Result};
use crate::graph::VInt;

/// Community id, dense in `0..k` once renumbered.
pub type CommID = u32;

/// Assignment of vertices to communities, in vertex order.
pub type Partition = IndexMap<VInt, CommID>;

/// Renumber the communities from 0 in order of first appearance.
pub fn renumber(partition: &Partition) -> Partition {
    let mut new_ids: IndexMap<CommID, CommID> = IndexMap::with_capacity(partition.len());
    partition
        .iter()
        .map(|(vertex, comm_id)| {
            let next = new_ids.len() as CommID;
            (*vertex, *new_ids.entry(*comm_id).or_insert(next))
        })
        .collect()
}

/// Number of distinct communities.
pub fn community_count(partition: &Partition) -> usize {
    partition.values().unique().count()
}

/// Vertices of each community, communities in order of first appearance.
pub fn community_members(partition: &Partition) -> IndexMap<CommID, Vec<VInt>> {
    partition.iter().fold(IndexMap::new(), |mut acc, (vertex, comm_id)| {
        acc.entry(*comm_id).or_insert_with(Vec::new).push(*vertex);
        acc
    })
}

/// Read a partition file, one `<vertex> <community>` pair per line.
pub fn read_partition_file(file_path: impl AsRef<Path>) -> Result<Partition> {
    let reader = BufReader::new(File::open(file_path.as_ref())?);
    let mut partition = Partition::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => continue,
            [vertex, comm_id] => {
                let parsed = vertex.parse::<VInt>().ok().zip(comm_id.parse::<CommID>().ok());
                match parsed {
                    Some((vertex, comm_id)) => {
                        partition.insert(vertex, comm_id);
                    }
                    None => {
                        return Err(CommunityError::Format(
                            format!("line {}: cannot parse '{}'", line_no + 1, line)));
                    }
                }
            }
            _ => {
                return Err(CommunityError::Format(
                    format!("line {}: expected '<vertex> <community>'", line_no + 1)));
            }
        }
    }
    Ok(partition)
}

#[cfg(test)]
mod test_community {
    use std::io::Write;

    use crate::community::{community_count, community_members, read_partition_file, renumber, Partition};

    #[test]
    fn test_renumber_first_appearance() {
        let partition: Partition = [(5, 42), (1, 7), (9, 42), (3, 100), (2, 7)].into_iter().collect();
        let res = renumber(&partition);
        let expected: Partition = [(5, 0), (1, 1), (9, 0), (3, 2), (2, 1)].into_iter().collect();
        assert_eq!(res, expected);
        // Vertex order is kept.
        assert_eq!(res.keys().copied().collect::<Vec<_>>(), vec![5, 1, 9, 3, 2]);
    }

    #[test]
    fn test_renumber_idempotent() {
        let partition: Partition = [(0, 0), (1, 1), (2, 0), (3, 2), (4, 1)].into_iter().collect();
        assert_eq!(renumber(&partition), partition);
        let once = renumber(&[(8, 3), (6, 3), (7, 9)].into_iter().collect());
        assert_eq!(renumber(&once), once);
    }

    #[test]
    fn test_renumber_empty() {
        assert!(renumber(&Partition::new()).is_empty());
    }

    #[test]
    fn test_members() {
        let partition: Partition = [(0, 2), (1, 1), (2, 2)].into_iter().collect();
        assert_eq!(community_count(&partition), 2);
        let members = community_members(&partition);
        assert_eq!(members.get_index(0), Some((&2, &vec![0, 2])));
        assert_eq!(members.get(&1), Some(&vec![1]));
    }

    #[test]
    fn test_read_partition_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "3 1").unwrap();
        writeln!(file, "1 0").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "2 1").unwrap();
        file.flush().unwrap();
        let partition = read_partition_file(file.path()).unwrap();
        let expected: Partition = [(3, 1), (1, 0), (2, 1)].into_iter().collect();
        assert_eq!(partition, expected);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "3 1 4").unwrap();
        bad.flush().unwrap();
        assert!(read_partition_file(bad.path()).is_err());
    }
}
