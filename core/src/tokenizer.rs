/// Split text into words on runs of the space character.
///
/// Only `' '` separates words; every other byte, tabs and newlines included,
/// belongs to a word and is caught later by [`is_valid_word`].
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// A word is valid when it has no control characters below `' '`.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| c < ' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_space_runs() {
        let words = split_into_words("  funny pet   and nasty rat ");
        assert_eq!(words, vec!["funny", "pet", "and", "nasty", "rat"]);
    }

    #[test]
    fn empty_text_has_no_words() {
        assert!(split_into_words("").is_empty());
        assert!(split_into_words("    ").is_empty());
    }

    #[test]
    fn tabs_are_not_separators() {
        assert_eq!(split_into_words("cat\tdog"), vec!["cat\tdog"]);
    }

    #[test]
    fn control_characters_are_forbidden() {
        assert!(is_valid_word("cat-dog"));
        assert!(is_valid_word("кот"));
        assert!(!is_valid_word("N\x17O\x16W"));
        assert!(!is_valid_word("\x00"));
        assert!(!is_valid_word("line\n"));
    }
}
