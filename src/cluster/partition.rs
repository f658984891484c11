use core::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// One surviving cluster inside a [`Partition`] snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionCluster {
    /// Surviving cluster id (the lowest original document index it absorbed).
    pub id: usize,
    /// Member document ids, ascending.
    pub members: Vec<usize>,
}

/// Flat snapshot of the active clusters at a checkpoint.
///
/// Clusters are ordered by ascending surviving id; member lists are sorted.
/// Together the members form an exact partition of the document id space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub clusters: Vec<PartitionCluster>,
}

impl Partition {
    #[inline]
    pub fn n_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Total documents across all clusters.
    pub fn n_documents(&self) -> usize {
        self.clusters.iter().map(|c| c.members.len()).sum()
    }

    /// Write the flat-file form: member ids 1-indexed, one per line, with a
    /// blank line closing each cluster.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for cluster in &self.clusters {
            for &doc in &cluster.members {
                writeln!(w, "{}", doc + 1)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cluster in &self.clusters {
            for &doc in &cluster.members {
                writeln!(f, "{}", doc + 1)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_file_format() {
        let partition = Partition {
            clusters: vec![
                PartitionCluster {
                    id: 0,
                    members: vec![0, 1, 3],
                },
                PartitionCluster {
                    id: 2,
                    members: vec![2],
                },
            ],
        };
        assert_eq!(partition.to_string(), "1\n2\n4\n\n3\n\n");

        let mut buf = Vec::new();
        partition.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), partition.to_string());
    }

    #[test]
    fn test_document_count() {
        let partition = Partition {
            clusters: vec![PartitionCluster {
                id: 0,
                members: vec![0, 1],
            }],
        };
        assert_eq!(partition.n_clusters(), 1);
        assert_eq!(partition.n_documents(), 2);
    }
}
