//! Tokenizers for word and line granularity.
//!
//! Both tokenizers are lossless: concatenating the tokens yields the input.

use std::sync::OnceLock;

use regex::Regex;

use super::Granularity;

/// Whitespace runs and non-whitespace runs, alternating.
fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+|\S+").expect("word token pattern is valid"))
}

/// Split text into word tokens.
///
/// Whitespace is kept as its own token so unchanged spans reproduce interior
/// spacing and line breaks exactly.
pub fn words(text: &str) -> Vec<&str> {
    word_pattern().find_iter(text).map(|m| m.as_str()).collect()
}

/// Split text into lines, each keeping its trailing `'\n'`.
///
/// A final line without a terminator is returned as-is.
pub fn lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Tokenize text at the given granularity.
pub fn tokenize(text: &str, granularity: Granularity) -> Vec<&str> {
    match granularity {
        Granularity::Word => words(text),
        Granularity::Line => lines(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_keep_whitespace() {
        assert_eq!(
            words("  Hello\tbrave\n\nworld "),
            vec!["  ", "Hello", "\t", "brave", "\n\n", "world", " "]
        );
        assert!(words("").is_empty());
    }

    #[test]
    fn test_words_are_lossless() {
        let text = "Lorem  ipsum,\u{00A0}dolor\r\nsit amet.";
        assert_eq!(words(text).concat(), text);
    }

    #[test]
    fn test_lines() {
        assert_eq!(lines("a\nb\nc"), vec!["a\n", "b\n", "c"]);
        assert_eq!(lines("a\n\n"), vec!["a\n", "\n"]);
        assert!(lines("").is_empty());
    }
}
