use std::io::BufRead;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::math::{dot, norm_sq};

/// Cosine similarity of two dense vectors. A zero-norm vector scores 0.0
/// against everything.
#[inline]
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let denom = (norm_sq(a) * norm_sq(b)).sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot(a, b) / denom
    }
}

/// Pairwise similarity table over cluster ids.
///
/// Upper-triangular: every unordered pair is stored exactly once under
/// (lower id, higher id), so `rows[i]` only ever holds keys greater than `i`.
/// The diagonal is implicit and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityTable {
    rows: Vec<IndexMap<usize, f64>>,
}

impl SimilarityTable {
    /// Pairwise cosine similarities of the given document vectors.
    ///
    /// Rows are independent of each other, so they are filled in parallel;
    /// the result is identical to a sequential fill.
    pub fn from_vectors(vectors: &[Vec<f64>]) -> Result<Self> {
        if vectors.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let dim = vectors[0].len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: bad.len(),
            });
        }

        let n = vectors.len();
        let rows: Vec<IndexMap<usize, f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut row = IndexMap::with_capacity(n - i - 1);
                for j in (i + 1)..n {
                    row.insert(j, cosine(&vectors[i], &vectors[j]));
                }
                row
            })
            .collect();
        Ok(Self { rows })
    }

    /// Parse a precomputed table: one whitespace-separated row per document
    /// index, holding values for all higher indices (the diagonal omitted).
    ///
    /// A token that fails to parse as a finite float is skipped without
    /// advancing the column, matching the tolerant input contract; everything
    /// else about the file shape must line up with `n`. A row carrying more
    /// values than its triangle slot holds would mint ids outside the table,
    /// so that is a hard error.
    pub fn from_reader<R: BufRead>(reader: R, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::EmptyCorpus);
        }
        let mut rows: Vec<IndexMap<usize, f64>> = Vec::with_capacity(n);
        for line in reader.lines() {
            let line = line?;
            if rows.len() == n {
                return Err(Error::DimensionMismatch {
                    expected: n,
                    found: n + 1,
                });
            }
            let i = rows.len();
            let mut row = IndexMap::new();
            let mut j = i + 1;
            for token in line.split_whitespace() {
                if let Ok(value) = token.parse::<f64>() {
                    if !value.is_finite() {
                        continue;
                    }
                    if j >= n {
                        return Err(Error::DimensionMismatch {
                            expected: n - i - 1,
                            found: j - i,
                        });
                    }
                    row.insert(j, value);
                    j += 1;
                }
            }
            rows.push(row);
        }
        // The final (empty) row is often left off the file.
        while rows.len() < n {
            rows.push(IndexMap::new());
        }
        Ok(Self { rows })
    }

    /// Number of ids the table was built over.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Similarity of an unordered pair.
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> Option<f64> {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.rows.get(lo)?.get(&hi).copied()
    }

    /// Insert or overwrite the entry for an unordered pair.
    pub fn set(&mut self, a: usize, b: usize, value: f64) {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.rows[lo].insert(hi, value);
    }

    /// Drop every entry referencing `id`. Called when a cluster is absorbed;
    /// its id never comes back.
    pub fn retire(&mut self, id: usize) {
        self.rows[id].clear();
        for row in self.rows.iter_mut().take(id) {
            row.shift_remove(&id);
        }
    }

    /// The stored (higher-id, similarity) entries of one row.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows[i].iter().map(|(&j, &s)| (j, s))
    }
}
