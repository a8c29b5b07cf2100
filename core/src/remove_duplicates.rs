use crate::{DocId, ExecutionPolicy, Result, SearchIndex};
use std::collections::BTreeSet;

/// Remove documents whose set of distinct indexed words equals that of a
/// document with a lower id. Returns the removed ids in ascending order.
///
/// Documents without indexed words have nothing to compare and are kept.
pub fn remove_duplicates(index: &mut SearchIndex) -> Result<Vec<DocId>> {
    let duplicates = find_duplicates(index);
    for &document_id in &duplicates {
        tracing::info!(document_id, "found duplicate document id");
    }
    index.remove_documents(ExecutionPolicy::Sequential, &duplicates)?;
    Ok(duplicates)
}

fn find_duplicates(index: &SearchIndex) -> Vec<DocId> {
    let mut seen: BTreeSet<Vec<&str>> = BTreeSet::new();
    let mut duplicates = Vec::new();
    for document_id in index {
        let row = index.word_frequencies(document_id);
        if row.is_empty() { continue; }
        // Keys of the row are already sorted and distinct.
        let words: Vec<&str> = row.keys().map(String::as_str).collect();
        if !seen.insert(words) {
            duplicates.push(document_id);
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentStatus;

    #[test]
    fn keeps_first_of_each_group() {
        let mut index = SearchIndex::new("and with").unwrap();
        let docs = [
            (1, "funny pet and nasty rat"),
            (2, "funny pet with curly hair"),
            (3, "funny pet with curly hair"),
            (4, "funny pet and curly hair"),
            (5, "funny funny pet and nasty nasty rat"),
            (6, "funny pet and not very nasty rat"),
            (7, "very nasty rat and not very funny pet"),
            (8, "pet with rat and rat and rat"),
            (9, "nasty rat with curly hair"),
        ];
        for (id, text) in docs {
            index.add_document(id, text, DocumentStatus::Actual, &[1, 2]).unwrap();
        }

        let removed = remove_duplicates(&mut index).unwrap();
        assert_eq!(removed, vec![3, 4, 5, 7]);
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![1, 2, 6, 8, 9]);
    }

    #[test]
    fn wordless_documents_are_not_duplicates() {
        let mut index = SearchIndex::new("the").unwrap();
        index.add_document(0, "the", DocumentStatus::Actual, &[]).unwrap();
        index.add_document(1, "", DocumentStatus::Actual, &[]).unwrap();
        assert!(remove_duplicates(&mut index).unwrap().is_empty());
        assert_eq!(index.document_count(), 2);
    }
}
