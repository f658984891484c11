use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-term bookkeeping: how many documents contain the term, and the raw
/// occurrence count inside each of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermEntry {
    /// Number of distinct documents with a non-zero count for this term.
    pub df: u32,
    /// Raw term frequency per document id, in first-seen order.
    #[serde(with = "indexmap::map::serde_seq")]
    pub tf_by_doc: IndexMap<usize, u32>,
}

/// Corpus vocabulary.
///
/// Term ids are dense integers equal to the insertion index, so the id space
/// is fully determined by first-seen order over a deterministic corpus scan.
/// Entries are never removed; `df` can only grow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermDictionary {
    #[serde(with = "indexmap::map::serde_seq")]
    terms: IndexMap<Box<str>, TermEntry>,
}

impl TermDictionary {
    pub fn new() -> Self {
        Self {
            terms: IndexMap::new(),
        }
    }

    /// Record one occurrence of `stem` in `doc_id`.
    ///
    /// Creates the term on first sighting (df starts at 1, so the IDF
    /// denominator can never be zero) and bumps df exactly once per document.
    pub fn observe(&mut self, doc_id: usize, stem: &str) {
        let idx = match self.terms.get_index_of(stem) {
            Some(idx) => idx,
            None => {
                let fresh = TermEntry {
                    df: 0,
                    tf_by_doc: IndexMap::new(),
                };
                self.terms.insert_full(Box::from(stem), fresh).0
            }
        };
        let entry = &mut self.terms[idx];
        let count = entry.tf_by_doc.entry(doc_id).or_insert(0);
        if *count == 0 {
            entry.df += 1;
        }
        *count += 1;
    }

    /// Dense id of a term, if present.
    #[inline]
    pub fn term_id(&self, stem: &str) -> Option<usize> {
        self.terms.get_index_of(stem)
    }

    /// Entry lookup by dense id.
    #[inline]
    pub fn get_by_id(&self, term_id: usize) -> Option<(&str, &TermEntry)> {
        self.terms.get_index(term_id).map(|(k, v)| (k.as_ref(), v))
    }

    /// Document frequency of a term id, 0 when out of range.
    #[inline]
    pub fn df(&self, term_id: usize) -> u32 {
        self.terms.get_index(term_id).map_or(0, |(_, e)| e.df)
    }

    /// Raw term frequency of `term_id` inside `doc_id`.
    #[inline]
    pub fn tf(&self, term_id: usize, doc_id: usize) -> u32 {
        self.terms
            .get_index(term_id)
            .and_then(|(_, e)| e.tf_by_doc.get(&doc_id).copied())
            .unwrap_or(0)
    }

    /// Vocabulary size.
    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate entries in term-id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &TermEntry)> {
        self.terms
            .iter()
            .enumerate()
            .map(|(id, (k, v))| (id, k.as_ref(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_first_seen_order() {
        let mut dict = TermDictionary::new();
        dict.observe(0, "alpha");
        dict.observe(0, "beta");
        dict.observe(1, "alpha");
        dict.observe(1, "gamma");

        assert_eq!(dict.term_id("alpha"), Some(0));
        assert_eq!(dict.term_id("beta"), Some(1));
        assert_eq!(dict.term_id("gamma"), Some(2));
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn test_df_counts_documents_once() {
        let mut dict = TermDictionary::new();
        dict.observe(0, "alpha");
        dict.observe(0, "alpha");
        dict.observe(0, "alpha");
        dict.observe(1, "alpha");

        let id = dict.term_id("alpha").unwrap();
        assert_eq!(dict.df(id), 2);
        assert_eq!(dict.tf(id, 0), 3);
        assert_eq!(dict.tf(id, 1), 1);
        assert_eq!(dict.tf(id, 2), 0);
    }

    #[test]
    fn test_df_matches_nonzero_tf_documents() {
        let mut dict = TermDictionary::new();
        for (doc, text) in ["a b a", "b c", "c c c a"].iter().enumerate() {
            for tok in text.split_whitespace() {
                dict.observe(doc, tok);
            }
        }
        for (_, _, entry) in dict.iter() {
            let nonzero = entry.tf_by_doc.values().filter(|&&tf| tf > 0).count();
            assert_eq!(entry.df as usize, nonzero);
        }
    }
}
