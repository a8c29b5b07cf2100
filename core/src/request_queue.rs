use crate::{DocId, Document, DocumentStatus, Result, SearchIndex};
use std::collections::VecDeque;

/// Number of most recent requests kept in the window.
pub const MIN_IN_DAY: u64 = 1440;

#[derive(Debug, Clone, Copy)]
struct QueryResult {
    timestamp: u64,
    is_empty: bool,
}

/// Forwards searches to an index and keeps statistics over a sliding window
/// of the last [`MIN_IN_DAY`] requests. Time advances by one per request.
pub struct RequestQueue<'a> {
    index: &'a SearchIndex,
    requests: VecDeque<QueryResult>,
    no_result_requests: usize,
    current_time: u64,
}

impl<'a> RequestQueue<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self { index, requests: VecDeque::new(), no_result_requests: 0, current_time: 0 }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let result = self.index.find_top_documents(raw_query)?;
        Ok(self.record(result))
    }

    pub fn add_find_request_by_status(&mut self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        let result = self.index.find_top_documents_by_status(raw_query, status)?;
        Ok(self.record(result))
    }

    pub fn add_find_request_with<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let result = self.index.find_top_documents_by(raw_query, predicate)?;
        Ok(self.record(result))
    }

    /// Requests inside the window that found nothing.
    pub fn no_result_requests(&self) -> usize { self.no_result_requests }

    fn record(&mut self, result: Vec<Document>) -> Vec<Document> {
        self.current_time += 1;
        while let Some(oldest) = self.requests.front() {
            if self.current_time - oldest.timestamp < MIN_IN_DAY {
                break;
            }
            if oldest.is_empty {
                self.no_result_requests -= 1;
            }
            self.requests.pop_front();
        }
        let is_empty = result.is_empty();
        if is_empty {
            self.no_result_requests += 1;
        }
        self.requests.push_back(QueryResult { timestamp: self.current_time, is_empty });
        result
    }
}
