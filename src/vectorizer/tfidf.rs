/// TF-IDF weighting seam.
///
/// Implementing this trait plugs a different weighting strategy into
/// [`Vectorizer`](super::Vectorizer) without touching the dictionary
/// bookkeeping.
pub trait TfIdfEngine {
    /// Weight of a term inside one document.
    ///
    /// # Arguments
    /// * `doc_count` - corpus size N
    /// * `df` - document frequency of the term, always >= 1
    /// * `tf` - raw term frequency inside the document
    fn weight(doc_count: usize, df: u32, tf: u32) -> f64;
}

/// Textbook log-scaled engine: `log10(N / df) * tf`.
#[derive(Debug, Default)]
pub struct LogTfIdfEngine;

impl TfIdfEngine for LogTfIdfEngine {
    #[inline]
    fn weight(doc_count: usize, df: u32, tf: u32) -> f64 {
        (doc_count as f64 / df as f64).log10() * tf as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_weighting() {
        // N = 100, df = 10 -> idf = 1.0
        assert!((LogTfIdfEngine::weight(100, 10, 3) - 3.0).abs() < 1e-12);
        // Term present in every document carries no weight.
        assert_eq!(LogTfIdfEngine::weight(50, 50, 7), 0.0);
        // Absent term has zero tf, therefore zero weight.
        assert_eq!(LogTfIdfEngine::weight(100, 10, 0), 0.0);
    }
}
