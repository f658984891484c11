//! A batch document-clustering engine built on TF-IDF vectors.
//!
//! The pipeline is one-way: raw text is stemmed, the corpus is vectorized,
//! pairwise cosine similarities are computed (or loaded precomputed), and an
//! agglomerative complete-link engine merges documents into a cluster
//! hierarchy, emitting flat partitions at configured cluster-count
//! checkpoints.

pub mod cluster;
pub mod error;
pub mod stemmer;
pub mod utils;
pub mod vectorizer;

/// Porter suffix-stripping stemmer.
/// Pure token normalizer: lowercase ASCII word in, stem out. The internal
/// buffer is re-seeded per call, so one instance serves a whole corpus scan.
pub use stemmer::PorterStemmer;

/// Token stream preparation (splitting, lowercasing, stop-word and digit
/// filtering) ahead of stemming. Stop-word lists are supplied by the caller.
pub use vectorizer::token::Tokenizer;

/// Corpus-wide TF-IDF vectorizer.
/// Builds the term dictionary while documents stream in, then materializes
/// one dense weight vector per document. The weighting strategy is pluggable
/// through the `TfIdfEngine` trait; `LogTfIdfEngine` is the
/// `log10(N / df) * tf` default.
pub use vectorizer::{Vectorizer, VectorizerData};

pub use vectorizer::term::TermDictionary;
pub use vectorizer::tfidf::{LogTfIdfEngine, TfIdfEngine};

/// Pairwise similarity storage, upper-triangular with the lower id first.
/// Built either from document vectors (parallel cosine) or parsed from a
/// precomputed whitespace-separated table.
pub use cluster::similarity::SimilarityTable;

/// The clustering engine itself: arena of cluster records, per-cluster
/// priority lists, complete-link merge steps, checkpoint snapshots.
pub use cluster::engine::{ClusterEngine, Merge};

/// Flat partition snapshot emitted at each checkpoint.
pub use cluster::partition::{Partition, PartitionCluster};

pub use error::{Error, Result};
