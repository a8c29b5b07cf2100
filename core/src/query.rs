//! Query parsing: plus-words, minus-words and stop-word filtering.
//!
//! Words borrow from the raw query text; nothing is copied until a result
//! has to outlive the query.

use crate::stop_words::StopWords;
use crate::tokenizer::{is_valid_word, split_into_words};
use crate::{Error, Result};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueryWord<'q> {
    data: &'q str,
    is_minus: bool,
    is_stop: bool,
}

/// Parsed query with disjoint, deduplicated plus and minus sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: BTreeSet<&'q str>,
    pub minus_words: BTreeSet<&'q str>,
}

/// Parsed query in input order, duplicates kept. Cheaper to build and fine
/// for callers that dedup at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryWords<'q> {
    pub plus_words: Vec<&'q str>,
    pub minus_words: Vec<&'q str>,
}

fn parse_query_word<'q>(text: &'q str, stop_words: &StopWords) -> Result<QueryWord<'q>> {
    let (data, is_minus) = match text.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    if data.is_empty() {
        return Err(Error::InvalidQuery("standalone '-' in query".into()));
    }
    if data.starts_with('-') {
        return Err(Error::InvalidQuery(format!("double minus in query word {text:?}")));
    }
    if !is_valid_word(data) {
        return Err(Error::InvalidQuery(format!("forbidden characters in query word {data:?}")));
    }
    Ok(QueryWord { data, is_minus, is_stop: stop_words.contains(data) })
}

/// Parse a raw query into plus and minus sets. Stop words are dropped from
/// both sets. A word given both ways counts only as a minus-word.
pub fn parse_query<'q>(text: &'q str, stop_words: &StopWords) -> Result<Query<'q>> {
    let mut query = Query::default();
    for word in split_into_words(text) {
        let word = parse_query_word(word, stop_words)?;
        if word.is_stop { continue; }
        if word.is_minus {
            query.minus_words.insert(word.data);
        } else {
            query.plus_words.insert(word.data);
        }
    }
    query.plus_words.retain(|word| !query.minus_words.contains(word));
    Ok(query)
}

/// Same validation as [`parse_query`], but keeps input order and duplicates.
pub fn parse_query_words<'q>(text: &'q str, stop_words: &StopWords) -> Result<QueryWords<'q>> {
    let mut query = QueryWords::default();
    for word in split_into_words(text) {
        let word = parse_query_word(word, stop_words)?;
        if word.is_stop { continue; }
        if word.is_minus {
            query.minus_words.push(word.data);
        } else {
            query.plus_words.push(word.data);
        }
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(text: &str) -> StopWords { StopWords::from_text(text).unwrap() }

    #[test]
    fn splits_plus_and_minus() {
        let q = parse_query("fluffy -collar cat cat", &stop("")).unwrap();
        assert_eq!(q.plus_words.into_iter().collect::<Vec<_>>(), vec!["cat", "fluffy"]);
        assert_eq!(q.minus_words.into_iter().collect::<Vec<_>>(), vec!["collar"]);
    }

    #[test]
    fn hyphen_inside_word_is_plain() {
        let q = parse_query("cat-dog", &stop("")).unwrap();
        assert!(q.plus_words.contains("cat-dog"));
        assert!(q.minus_words.is_empty());
    }

    #[test]
    fn stop_words_leave_both_sets() {
        let q = parse_query("cat -in the", &stop("in the")).unwrap();
        assert_eq!(q.plus_words.len(), 1);
        assert!(q.minus_words.is_empty());
    }

    #[test]
    fn minus_wins_over_plus() {
        let q = parse_query("cat -cat dog", &stop("")).unwrap();
        assert!(!q.plus_words.contains("cat"));
        assert!(q.minus_words.contains("cat"));
    }

    #[test]
    fn malformed_minus_words_fail() {
        for raw in ["cat --in the city", "dog in the - city", "-", "--"] {
            let err = parse_query(raw, &stop("")).unwrap_err();
            assert!(matches!(err, Error::InvalidQuery(_)), "{raw:?} -> {err:?}");
        }
    }

    #[test]
    fn control_characters_fail() {
        let err = parse_query("dog N\x17O\x16W cat", &stop("")).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
        let err = parse_query_words("-N\x17O", &stop("")).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn word_list_keeps_duplicates() {
        let q = parse_query_words("b a b -c -c", &stop("")).unwrap();
        assert_eq!(q.plus_words, vec!["b", "a", "b"]);
        assert_eq!(q.minus_words, vec!["c", "c"]);
    }

    #[test]
    fn empty_query_is_valid() {
        let q = parse_query("   ", &stop("")).unwrap();
        assert!(q.plus_words.is_empty() && q.minus_words.is_empty());
    }
}
