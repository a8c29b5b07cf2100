use crate::{Document, Result, SearchIndex};
use rayon::prelude::*;

/// Run every query against the same index in parallel. Results keep the
/// order of `queries`; the first invalid query fails the batch.
pub fn process_queries<S>(index: &SearchIndex, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    queries.par_iter().map(|query| index.find_top_documents(query.as_ref())).collect()
}

/// [`process_queries`] flattened into one list, still in query order.
pub fn process_queries_joined<S>(index: &SearchIndex, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(index, queries)?.into_iter().flatten().collect())
}
