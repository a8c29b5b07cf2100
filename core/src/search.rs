//! Ranking and matching over a [`SearchIndex`].

use crate::concurrent_map::ConcurrentMap;
use crate::query::{parse_query, parse_query_words, Query};
use crate::{DocId, Document, DocumentStatus, Error, ExecutionPolicy, Result, SearchIndex};
use rayon::prelude::*;
use std::collections::BTreeMap;

pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevances closer than this are treated as equal and ranked by rating.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

const RELEVANCE_SHARDS: usize = 64;

impl SearchIndex {
    /// Top documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(&self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, |_, document_status, _| document_status == status)
    }

    /// Top documents among those accepted by `predicate(id, status, rating)`.
    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let query = parse_query(raw_query, &self.stop_words)?;
        let mut matched = self.find_all_documents(&query, &predicate);
        rank_documents(&mut matched);
        matched.truncate(MAX_RESULT_DOCUMENT_COUNT);
        Ok(matched)
    }

    pub fn find_top_documents_with<P>(&self, policy: ExecutionPolicy, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        if policy == ExecutionPolicy::Sequential {
            return self.find_top_documents_by(raw_query, predicate);
        }
        let query = parse_query(raw_query, &self.stop_words)?;
        let mut matched = self.find_all_documents_par(&query, &predicate);
        rank_documents(&mut matched);
        matched.truncate(MAX_RESULT_DOCUMENT_COUNT);
        Ok(matched)
    }

    /// Plus-words of `raw_query` present in the document, sorted and
    /// deduplicated, together with the document's status. Any minus-word in
    /// the document empties the list.
    pub fn match_document(&self, raw_query: &str, document_id: DocId) -> Result<(Vec<&str>, DocumentStatus)> {
        let (row, status) = self.document_row(document_id)?;
        let query = parse_query(raw_query, &self.stop_words)?;

        if query.minus_words.iter().any(|word| row.contains_key(*word)) {
            return Ok((Vec::new(), status));
        }
        let matched = query
            .plus_words
            .iter()
            .filter_map(|word| row.get_key_value(*word).map(|(stored, _)| stored.as_str()))
            .collect();
        Ok((matched, status))
    }

    pub fn match_document_with(&self, policy: ExecutionPolicy, raw_query: &str, document_id: DocId) -> Result<(Vec<&str>, DocumentStatus)> {
        if policy == ExecutionPolicy::Sequential {
            return self.match_document(raw_query, document_id);
        }
        let (row, status) = self.document_row(document_id)?;
        let query = parse_query_words(raw_query, &self.stop_words)?;

        if query.minus_words.par_iter().any(|word| row.contains_key(*word)) {
            return Ok((Vec::new(), status));
        }
        let mut matched: Vec<&str> = query
            .plus_words
            .par_iter()
            .filter_map(|word| row.get_key_value(*word).map(|(stored, _)| stored.as_str()))
            .collect();
        matched.par_sort_unstable();
        matched.dedup();
        Ok((matched, status))
    }

    fn document_row(&self, document_id: DocId) -> Result<(&BTreeMap<String, f64>, DocumentStatus)> {
        let data = self
            .documents
            .get(&document_id)
            .ok_or_else(|| Error::InvalidArgument(format!("document {document_id} not found")))?;
        Ok((self.word_frequencies(document_id), data.status))
    }

    fn inverse_document_freq(&self, documents_with_word: usize) -> f64 {
        (self.document_count() as f64 / documents_with_word as f64).ln()
    }

    fn find_all_documents<P>(&self, query: &Query<'_>, predicate: &P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut document_to_relevance: BTreeMap<DocId, f64> = BTreeMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.word_to_document_freqs.get(*word) else { continue };
            let idf = self.inverse_document_freq(postings.len());
            for (&document_id, &term_freq) in postings {
                let Some(data) = self.documents.get(&document_id) else { continue };
                if predicate(document_id, data.status, data.rating) {
                    *document_to_relevance.entry(document_id).or_insert(0.0) += term_freq * idf;
                }
            }
        }

        for word in &query.minus_words {
            let Some(postings) = self.word_to_document_freqs.get(*word) else { continue };
            for document_id in postings.keys() {
                document_to_relevance.remove(document_id);
            }
        }
        self.to_documents(document_to_relevance)
    }

    fn find_all_documents_par<P>(&self, query: &Query<'_>, predicate: &P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let document_to_relevance: ConcurrentMap<DocId, f64> = ConcurrentMap::new(RELEVANCE_SHARDS);
        query.plus_words.par_iter().for_each(|word| {
            let Some(postings) = self.word_to_document_freqs.get(*word) else { return };
            let idf = self.inverse_document_freq(postings.len());
            for (&document_id, &term_freq) in postings {
                let Some(data) = self.documents.get(&document_id) else { continue };
                if predicate(document_id, data.status, data.rating) {
                    *document_to_relevance.access(document_id) += term_freq * idf;
                }
            }
        });

        query.minus_words.par_iter().for_each(|word| {
            let Some(postings) = self.word_to_document_freqs.get(*word) else { return };
            for document_id in postings.keys() {
                document_to_relevance.erase(document_id);
            }
        });
        self.to_documents(document_to_relevance.build_ordinary_map())
    }

    fn to_documents(&self, document_to_relevance: BTreeMap<DocId, f64>) -> Vec<Document> {
        document_to_relevance
            .into_iter()
            .filter_map(|(id, relevance)| self.documents.get(&id).map(|data| Document::new(id, relevance, data.rating)))
            .collect()
    }
}

/// `lhs` ranks ahead of `rhs`: higher relevance first, and when the
/// relevances differ by less than [`RELEVANCE_EPSILON`], higher rating first.
fn ranks_before(lhs: &Document, rhs: &Document) -> bool {
    if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
        lhs.rating > rhs.rating
    } else {
        lhs.relevance > rhs.relevance
    }
}

/// Stable merge sort by [`ranks_before`].
///
/// The epsilon comparison is not transitive, so it is not handed to
/// `slice::sort_by`, which may panic on such comparators.
pub fn rank_documents(documents: &mut [Document]) {
    if documents.len() < 2 {
        return;
    }
    let mid = documents.len() / 2;
    rank_documents(&mut documents[..mid]);
    rank_documents(&mut documents[mid..]);

    let mut merged = Vec::with_capacity(documents.len());
    let (mut left, mut right) = (0, mid);
    while left < mid && right < documents.len() {
        if ranks_before(&documents[right], &documents[left]) {
            merged.push(documents[right]);
            right += 1;
        } else {
            merged.push(documents[left]);
            left += 1;
        }
    }
    merged.extend_from_slice(&documents[left..mid]);
    merged.extend_from_slice(&documents[right..]);
    documents.copy_from_slice(&merged);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: DocId, relevance: f64, rating: i32) -> Document { Document::new(id, relevance, rating) }

    fn ids(documents: &[Document]) -> Vec<DocId> { documents.iter().map(|d| d.id).collect() }

    #[test]
    fn ranks_by_relevance_then_rating() {
        let mut docs = vec![doc(1, 0.1, 9), doc(2, 0.5, 1), doc(3, 0.5 + 1e-7, 0), doc(4, 0.5 - 1e-7, 5), doc(5, 0.3, 2)];
        rank_documents(&mut docs);
        assert_eq!(ids(&docs), vec![4, 2, 3, 5, 1]);
    }

    #[test]
    fn close_pairs_chain_by_rating() {
        let a = doc(1, 1.0, 5);
        let b = doc(2, 1.0 - 0.8e-6, 0);
        let c = doc(3, 1.0 - 1.2e-6, 10);
        assert!(ranks_before(&a, &b) && ranks_before(&a, &c) && ranks_before(&c, &b));
        for mut docs in [vec![b, c, a], vec![a, b, c], vec![c, a, b]] {
            rank_documents(&mut docs);
            assert_eq!(ids(&docs), vec![1, 3, 2]);
        }
    }

    #[test]
    fn inconsistent_ties_do_not_panic() {
        let mut docs: Vec<Document> = (0..200).map(|i| doc(i, 1.0 - f64::from(i) * 4e-7, i % 7)).collect();
        rank_documents(&mut docs);
        assert_eq!(docs.len(), 200);
    }

    #[test]
    fn gap_of_epsilon_is_not_a_tie() {
        let mut docs = vec![doc(1, 0.5, 1), doc(2, 0.5 + 2e-6, 0)];
        rank_documents(&mut docs);
        assert_eq!(ids(&docs), vec![2, 1]);
    }

    #[test]
    fn equal_relevance_and_rating_keep_id_order() {
        let mut docs = vec![doc(1, 0.2, 3), doc(2, 0.2, 3), doc(3, 0.2, 3)];
        rank_documents(&mut docs);
        assert_eq!(ids(&docs), vec![1, 2, 3]);
    }

    #[test]
    fn unknown_document_cannot_be_matched() {
        let index = SearchIndex::default();
        let err = index.match_document("cat", 1).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = index.match_document_with(ExecutionPolicy::Parallel, "cat", 1).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn absent_plus_word_contributes_nothing() {
        let mut index = SearchIndex::default();
        index.add_document(0, "cat", DocumentStatus::Actual, &[]).unwrap();
        index.add_document(1, "dog", DocumentStatus::Actual, &[]).unwrap();
        let found = index.find_top_documents("cat parrot").unwrap();
        assert_eq!(ids(&found), vec![0]);
        assert!(index.find_top_documents("parrot -cat").unwrap().is_empty());
    }
}
