use crate::stop_words::StopWords;
use crate::tokenizer::{is_valid_word, split_into_words};
use crate::{DocumentStatus, Error, Result};
use rayon::prelude::*;
use std::collections::{btree_set, BTreeMap, BTreeSet};
use std::iter::Copied;

pub type DocId = i32;

/// Word → term frequency for one document.
pub type WordFrequencies = BTreeMap<String, f64>;

/// Ascending iterator over live document ids.
pub type DocumentIds<'a> = Copied<btree_set::Iter<'a, DocId>>;

static EMPTY_FREQUENCIES: WordFrequencies = BTreeMap::new();

/// How batch work inside a single call is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    /// Spread work over the rayon pool. Workers only ever touch disjoint
    /// posting lists.
    Parallel,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DocumentData {
    pub(crate) rating: i32,
    pub(crate) status: DocumentStatus,
}

/// In-memory TF-IDF index.
///
/// The inverted index (`word → {doc → tf}`) and the forward index
/// (`doc → {word → tf}`) always mirror each other: every mutation validates
/// its input first and only then touches both sides.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    pub(crate) stop_words: StopWords,
    pub(crate) word_to_document_freqs: BTreeMap<String, BTreeMap<DocId, f64>>,
    pub(crate) document_to_word_freqs: BTreeMap<DocId, WordFrequencies>,
    pub(crate) documents: BTreeMap<DocId, DocumentData>,
    document_ids: BTreeSet<DocId>,
}

impl SearchIndex {
    /// Index with stop words taken from space-separated text.
    pub fn new(stop_words_text: &str) -> Result<Self> {
        Ok(Self::from_stop_words(StopWords::from_text(stop_words_text)?))
    }

    pub fn with_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::from_stop_words(StopWords::from_words(stop_words)?))
    }

    pub fn from_stop_words(stop_words: StopWords) -> Self {
        Self { stop_words, ..Self::default() }
    }

    pub fn stop_words(&self) -> &StopWords { &self.stop_words }

    pub fn add_document(&mut self, document_id: DocId, document: &str, status: DocumentStatus, ratings: &[i32]) -> Result<()> {
        if document_id < 0 {
            return Err(Error::InvalidArgument(format!("negative document id {document_id}")));
        }
        if self.documents.contains_key(&document_id) {
            return Err(Error::InvalidArgument(format!("document {document_id} already indexed")));
        }
        let words = self.split_into_words_no_stop(document)?;

        let inv_word_count = 1.0 / words.len() as f64;
        let row = self.document_to_word_freqs.entry(document_id).or_default();
        for word in &words {
            *self.word_to_document_freqs.entry((*word).to_string()).or_default().entry(document_id).or_insert(0.0) += inv_word_count;
            *row.entry((*word).to_string()).or_insert(0.0) += inv_word_count;
        }
        self.documents.insert(document_id, DocumentData { rating: compute_average_rating(ratings), status });
        self.document_ids.insert(document_id);
        tracing::debug!(document_id, words = words.len(), distinct = row.len(), "document added");
        Ok(())
    }

    pub fn remove_document(&mut self, document_id: DocId) -> Result<()> {
        self.remove_documents(ExecutionPolicy::Sequential, &[document_id])
    }

    pub fn remove_document_with(&mut self, policy: ExecutionPolicy, document_id: DocId) -> Result<()> {
        self.remove_documents(policy, &[document_id])
    }

    /// Remove a batch of documents. Either every id is removed or, if any id
    /// is unknown or repeated, nothing is.
    pub fn remove_documents(&mut self, policy: ExecutionPolicy, document_ids: &[DocId]) -> Result<()> {
        let mut batch = BTreeSet::new();
        for &document_id in document_ids {
            if !self.document_ids.contains(&document_id) {
                return Err(Error::InvalidArgument(format!("document {document_id} not found")));
            }
            if !batch.insert(document_id) {
                return Err(Error::InvalidArgument(format!("document {document_id} listed twice for removal")));
            }
        }

        let rows: Vec<WordFrequencies> = batch
            .iter()
            .filter_map(|document_id| self.document_to_word_freqs.remove(document_id))
            .collect();
        let touched: BTreeSet<&str> = rows.iter().flat_map(|row| row.keys().map(String::as_str)).collect();

        match policy {
            ExecutionPolicy::Sequential => {
                for word in &touched {
                    if let Some(postings) = self.word_to_document_freqs.get_mut(*word) {
                        postings.retain(|document_id, _| !batch.contains(document_id));
                        if postings.is_empty() {
                            self.word_to_document_freqs.remove(*word);
                        }
                    }
                }
            }
            ExecutionPolicy::Parallel => {
                // Detach only the touched lists so workers own disjoint keys.
                let mut lists: Vec<(String, BTreeMap<DocId, f64>)> = touched
                    .iter()
                    .filter_map(|word| self.word_to_document_freqs.remove_entry(*word))
                    .collect();
                lists
                    .par_iter_mut()
                    .for_each(|(_, postings)| postings.retain(|document_id, _| !batch.contains(document_id)));
                for (word, postings) in lists {
                    if !postings.is_empty() {
                        self.word_to_document_freqs.insert(word, postings);
                    }
                }
            }
        }

        for document_id in &batch {
            self.documents.remove(document_id);
            self.document_ids.remove(document_id);
        }
        tracing::debug!(removed = batch.len(), words = touched.len(), ?policy, "documents removed");
        Ok(())
    }

    /// Forward-index row for `document_id`; empty when the id is unknown.
    pub fn word_frequencies(&self, document_id: DocId) -> &WordFrequencies {
        self.document_to_word_freqs.get(&document_id).unwrap_or(&EMPTY_FREQUENCIES)
    }

    pub fn document_count(&self) -> usize { self.documents.len() }

    pub fn contains(&self, document_id: DocId) -> bool { self.document_ids.contains(&document_id) }

    pub fn iter(&self) -> DocumentIds<'_> { self.document_ids.iter().copied() }

    fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(Error::InvalidQuery(format!("forbidden characters in document word {word:?}")));
            }
            if !self.stop_words.contains(word) {
                words.push(word);
            }
        }
        Ok(words)
    }
}

impl<'a> IntoIterator for &'a SearchIndex {
    type Item = DocId;
    type IntoIter = DocumentIds<'a>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

/// Mean of the ratings, truncated toward zero; 0 when there are none.
fn compute_average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}
