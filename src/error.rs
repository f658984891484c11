use core::fmt;

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the vectorizer and the clustering engine.
///
/// Two conditions are deliberately *not* errors and never appear here: a
/// malformed token in a similarity-table row (skipped during parsing) and a
/// tie during best-pair selection (resolved by scan order).
#[derive(Debug)]
pub enum Error {
    /// No documents were supplied.
    EmptyCorpus,
    /// A similarity table or vector had the wrong dimension.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },
    /// The checkpoint sequence was empty, non-descending, or contained zero.
    InvalidCheckpoints(String),
    /// A similarity entry expected by the merge bookkeeping was absent.
    MissingSimilarity {
        /// Lower cluster id of the pair.
        lower: usize,
        /// Higher cluster id of the pair.
        higher: usize,
    },
    /// A priority list did not contain an entry the merge step relies on.
    CorruptPriority {
        /// Cluster whose list is inconsistent.
        cluster: usize,
        /// The id that should have been present.
        missing: usize,
    },
    /// Underlying I/O failure.
    Io(std::io::Error),
    /// Model snapshot (de)serialization failure.
    Codec(serde_cbor::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyCorpus => write!(f, "empty corpus"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::InvalidCheckpoints(msg) => write!(f, "invalid checkpoints: {msg}"),
            Error::MissingSimilarity { lower, higher } => {
                write!(f, "no similarity entry for pair ({lower}, {higher})")
            }
            Error::CorruptPriority { cluster, missing } => {
                write!(
                    f,
                    "priority list of cluster {cluster} is missing entry {missing}"
                )
            }
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Codec(e) => write!(f, "codec error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_cbor::Error> for Error {
    fn from(e: serde_cbor::Error) -> Self {
        Error::Codec(e)
    }
}
