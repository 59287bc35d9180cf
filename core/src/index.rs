//! Full-text index over post contributions.
//!
//! Building and querying are separate types: contributions go into an
//! [`InvertedIndexBuilder`], and [`TextIndexBuilder::finalize`] turns it into
//! an immutable [`InvertedIndex`] that can be shared across request handlers.

use crate::tokenizer::{distinct_terms, tokenize};
use std::cmp::Ordering;
use std::collections::HashMap;

pub type TermId = u32;
pub type DocId = u32;

/// Write side of a text index.
pub trait TextIndexBuilder {
    type Index: TextIndex;

    /// Adds `text` to the searchable profile of `doc_id`. Repeated calls for
    /// the same document accumulate.
    fn index_contribution(&mut self, doc_id: DocId, text: &str);

    /// Freezes the accumulated contributions into a queryable index.
    fn finalize(self) -> Self::Index;
}

/// Read side of a text index. Implementations must be safe to query from
/// many threads at once.
pub trait TextIndex: Send + Sync {
    /// Matching documents, most relevant first.
    fn query(&self, text: &str) -> Vec<DocId>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f32, // cosine-normalized tf-idf weight
}

#[derive(Debug, Default)]
pub struct InvertedIndexBuilder {
    dictionary: HashMap<String, TermId>,
    term_freqs: Vec<HashMap<DocId, u32>>, // by term id
    num_docs: u32,
}

impl InvertedIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn term_id(&mut self, term: String) -> TermId {
        let next = self.term_freqs.len() as TermId;
        let id = *self.dictionary.entry(term).or_insert(next);
        if id == next {
            self.term_freqs.push(HashMap::new());
        }
        id
    }
}

impl TextIndexBuilder for InvertedIndexBuilder {
    type Index = InvertedIndex;

    fn index_contribution(&mut self, doc_id: DocId, text: &str) {
        self.num_docs = self.num_docs.max(doc_id + 1);
        for (term, _pos) in tokenize(text) {
            let tid = self.term_id(term);
            *self.term_freqs[tid as usize].entry(doc_id).or_insert(0) += 1;
        }
    }

    fn finalize(self) -> InvertedIndex {
        let n = self.num_docs.max(1) as f32;

        // First pass: raw tf-idf per (term, doc) and squared norms per doc.
        let mut doc_norms: HashMap<DocId, f32> = HashMap::new();
        let mut weighted: Vec<Vec<Posting>> = Vec::with_capacity(self.term_freqs.len());
        for freqs in self.term_freqs {
            let idf = smoothed_idf(n, freqs.len() as f32);
            let mut plist: Vec<Posting> = freqs
                .into_iter()
                .map(|(doc_id, tf_raw)| {
                    let weight = (1.0 + (tf_raw as f32).ln()) * idf;
                    *doc_norms.entry(doc_id).or_insert(0.0) += weight * weight;
                    Posting { doc_id, weight }
                })
                .collect();
            plist.sort_by_key(|p| p.doc_id);
            weighted.push(plist);
        }

        // Second pass: normalize so a dot product is a cosine.
        for plist in weighted.iter_mut() {
            for p in plist.iter_mut() {
                let norm = doc_norms.get(&p.doc_id).map(|s| s.sqrt()).unwrap_or(1.0);
                if norm > 0.0 {
                    p.weight /= norm;
                }
            }
        }

        tracing::debug!(num_docs = self.num_docs, num_terms = weighted.len(), "index finalized");
        InvertedIndex { dictionary: self.dictionary, postings: weighted, num_docs: self.num_docs }
    }
}

/// `ln(1 + N/df)`; stays positive for terms present in every document.
fn smoothed_idf(num_docs: f32, df: f32) -> f32 {
    (1.0 + num_docs / df.max(1.0)).ln()
}

#[derive(Debug)]
pub struct InvertedIndex {
    dictionary: HashMap<String, TermId>,
    postings: Vec<Vec<Posting>>, // by term id, sorted by doc_id
    num_docs: u32,
}

impl InvertedIndex {
    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    /// Scored matches for `text`. A document matches only if it contains
    /// every distinct query term.
    pub fn scored(&self, text: &str) -> Vec<(DocId, f32)> {
        let terms = distinct_terms(text);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut plists = Vec::with_capacity(terms.len());
        for term in &terms {
            match self.dictionary.get(term) {
                Some(&tid) => plists.push(&self.postings[tid as usize]),
                None => return Vec::new(),
            }
        }

        let n = self.num_docs.max(1) as f32;
        let q_weights: Vec<f32> = plists.iter().map(|p| smoothed_idf(n, p.len() as f32)).collect();
        let q_norm = q_weights.iter().map(|w| w * w).sum::<f32>().sqrt();
        let q_norm = if q_norm == 0.0 { 1.0 } else { q_norm };

        let mut scores: HashMap<DocId, (f32, usize)> = HashMap::new();
        for (plist, q_w) in plists.iter().zip(&q_weights) {
            for p in plist.iter() {
                let entry = scores.entry(p.doc_id).or_insert((0.0, 0));
                entry.0 += p.weight * q_w / q_norm;
                entry.1 += 1;
            }
        }

        let mut scored: Vec<(DocId, f32)> = scores
            .into_iter()
            .filter(|(_, (_, hits))| *hits == terms.len())
            .map(|(doc_id, (score, _))| (doc_id, score))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        scored
    }
}

impl TextIndex for InvertedIndex {
    fn query(&self, text: &str) -> Vec<DocId> {
        self.scored(text).into_iter().map(|(doc_id, _)| doc_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(docs: &[&[&str]]) -> InvertedIndex {
        let mut builder = InvertedIndexBuilder::new();
        for (id, parts) in docs.iter().enumerate() {
            for part in parts.iter() {
                builder.index_contribution(id as DocId, part);
            }
        }
        builder.finalize()
    }

    #[test]
    fn single_document_matches() {
        let index = build(&[&["Cat", "A fluffy cat"]]);
        let scored = index.scored("cat");
        assert_eq!(scored.len(), 1);
        assert!(scored[0].1 > 0.0);
    }

    #[test]
    fn contributions_accumulate() {
        let index = build(&[&["red apple", "green pear"]]);
        assert_eq!(index.query("apple"), vec![0]);
        assert_eq!(index.query("pear"), vec![0]);
        assert_eq!(index.query("apple pear"), vec![0]);
    }

    #[test]
    fn all_terms_must_match() {
        let index = build(&[&["dog", "pet"], &["cat", "pet"]]);
        assert_eq!(index.query("pet"), vec![0, 1]);
        assert_eq!(index.query("dog pet"), vec![0]);
        assert!(index.query("dog cat").is_empty());
        assert!(index.query("giraffe pet").is_empty());
    }

    #[test]
    fn more_relevant_documents_rank_first() {
        let index = build(&[&["bird"], &["mountain river"], &["mountain"]]);
        assert_eq!(index.query("mountain"), vec![2, 1]);
    }

    #[test]
    fn numbers_are_searchable() {
        let index = build(&[&["New Year 2019"], &["New Year 2020"]]);
        assert_eq!(index.query("2019"), vec![0]);
        assert_eq!(index.query("year 2020"), vec![1]);
    }

    #[test]
    fn empty_and_stopword_queries_match_nothing() {
        let index = build(&[&["the quick fox"]]);
        assert!(index.query("").is_empty());
        assert!(index.query("   ").is_empty());
        assert!(index.query("the and of").is_empty());
    }

    #[test]
    fn counts_terms_and_docs() {
        let index = build(&[&["alpha beta"], &[""], &["beta gamma"]]);
        assert_eq!(index.num_docs(), 3);
        assert_eq!(index.num_terms(), 3);
    }
}
