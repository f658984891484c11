pub mod term;
pub mod tfidf;
pub mod token;

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vectorizer::term::TermDictionary;
use crate::vectorizer::tfidf::{LogTfIdfEngine, TfIdfEngine};

/// Corpus-wide TF-IDF vectorizer.
///
/// Consumes stemmed token streams one document at a time, building the term
/// dictionary as it goes, then materializes one dense weight vector per
/// document once the full vocabulary is known. The weighting strategy is the
/// type parameter `E`; [`LogTfIdfEngine`] is the default.
///
/// A pure transformation: nothing here touches the filesystem.
#[derive(Debug, Clone, Default)]
pub struct Vectorizer<E = LogTfIdfEngine>
where
    E: TfIdfEngine,
{
    dictionary: TermDictionary,
    /// Document ids in scan order.
    doc_ids: Vec<usize>,
    _marker: PhantomData<E>,
}

impl<E> Vectorizer<E>
where
    E: TfIdfEngine,
{
    pub fn new() -> Self {
        Self {
            dictionary: TermDictionary::new(),
            doc_ids: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Feed one document's stemmed tokens into the dictionary.
    ///
    /// Documents are expected in a deterministic order; term ids follow the
    /// first sighting across this scan.
    pub fn add_document<I, T>(&mut self, doc_id: usize, stems: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for stem in stems {
            self.dictionary.observe(doc_id, stem.as_ref());
        }
        self.doc_ids.push(doc_id);
    }

    /// Number of documents fed so far.
    #[inline]
    pub fn doc_count(&self) -> usize {
        self.doc_ids.len()
    }

    #[inline]
    pub fn dictionary(&self) -> &TermDictionary {
        &self.dictionary
    }

    /// Dense TF-IDF vectors, one per document in scan order.
    ///
    /// Vector length equals the final vocabulary size; entries stay zero
    /// wherever the term is absent from the document.
    pub fn vectors(&self) -> Vec<Vec<f64>> {
        let n = self.doc_ids.len();
        let vocab = self.dictionary.len();
        let mut position = std::collections::HashMap::with_capacity(n);
        for (pos, &doc_id) in self.doc_ids.iter().enumerate() {
            position.insert(doc_id, pos);
        }

        let mut out = vec![vec![0.0f64; vocab]; n];
        for (term_id, _, entry) in self.dictionary.iter() {
            for (&doc_id, &tf) in entry.tf_by_doc.iter() {
                if let Some(&pos) = position.get(&doc_id) {
                    out[pos][term_id] = E::weight(n, entry.df, tf);
                }
            }
        }
        out
    }

    /// Snapshot of the fitted model for serialization.
    pub fn to_data(&self) -> VectorizerData {
        VectorizerData {
            dictionary: self.dictionary.clone(),
            doc_ids: self.doc_ids.clone(),
        }
    }
}

/// Serializable form of a fitted [`Vectorizer`].
///
/// Holds the dictionary and the document scan order but no engine; pass the
/// engine back in through the type parameter when rehydrating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerData {
    pub dictionary: TermDictionary,
    pub doc_ids: Vec<usize>,
}

impl VectorizerData {
    /// Encode as CBOR bytes.
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    /// Decode from CBOR bytes.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }

    /// Rebuild a vectorizer around the stored dictionary.
    pub fn into_vectorizer<E>(self) -> Vectorizer<E>
    where
        E: TfIdfEngine,
    {
        Vectorizer {
            dictionary: self.dictionary,
            doc_ids: self.doc_ids,
            _marker: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(vectorizer: &mut Vectorizer, docs: &[&str]) {
        for (id, doc) in docs.iter().enumerate() {
            vectorizer.add_document(id, doc.split_whitespace());
        }
    }

    #[test]
    fn test_weight_zero_iff_absent() {
        let mut v: Vectorizer = Vectorizer::new();
        feed(&mut v, &["cat dog", "dog fish", "cat cat bird"]);

        let vectors = v.vectors();
        let dict = v.dictionary();
        for (pos, vec) in vectors.iter().enumerate() {
            for term_id in 0..dict.len() {
                let tf = dict.tf(term_id, pos);
                if tf == 0 {
                    assert_eq!(vec[term_id], 0.0);
                } else {
                    // df == N gives idf 0; any rarer term must carry weight.
                    let df = dict.df(term_id);
                    if (df as usize) < vectors.len() {
                        assert!(vec[term_id] > 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_known_weights() {
        let mut v: Vectorizer = Vectorizer::new();
        feed(&mut v, &["cat cat", "dog"]);

        let vectors = v.vectors();
        let cat = v.dictionary().term_id("cat").unwrap();
        let dog = v.dictionary().term_id("dog").unwrap();
        // N = 2, df(cat) = 1, tf = 2 -> log10(2) * 2
        assert!((vectors[0][cat] - 2.0 * 2f64.log10()).abs() < 1e-12);
        assert_eq!(vectors[0][dog], 0.0);
        assert!((vectors[1][dog] - 2f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn test_vector_length_is_final_vocab_size() {
        let mut v: Vectorizer = Vectorizer::new();
        feed(&mut v, &["one", "one two", "one two three"]);
        for vec in v.vectors() {
            assert_eq!(vec.len(), 3);
        }
    }

    #[test]
    fn test_cbor_round_trip() {
        let mut v: Vectorizer = Vectorizer::new();
        feed(&mut v, &["alpha beta", "beta gamma"]);

        let bytes = v.to_data().to_cbor().unwrap();
        let restored: Vectorizer = VectorizerData::from_cbor(&bytes)
            .unwrap()
            .into_vectorizer();
        assert_eq!(restored.doc_count(), 2);
        assert_eq!(restored.vectors(), v.vectors());
    }
}
