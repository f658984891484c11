pub mod engine;
pub mod partition;
pub mod similarity;

pub use engine::{ClusterEngine, ClusterRecord, Merge};
pub use partition::{Partition, PartitionCluster};
pub use similarity::{cosine, SimilarityTable};
