//! Text normalization and tokenization shared by every similarity metric.

use regex::Regex;

use crate::error::{EvalError, Result};

/// Normalizes raw cell text before any comparison
///
/// Trims, collapses whitespace, and strips everything that is not a word
/// character, whitespace, or a Hangul syllable. Stripping can leave doubled or
/// edge spaces behind, so whitespace is collapsed and trimmed once more, which
/// makes [`TextNormalizer::normalize`] idempotent.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    extra_spaces_regex: Regex,
    special_chars_regex: Regex,
}

impl TextNormalizer {
    /// Create a normalizer with its regular expressions compiled.
    pub fn new() -> Result<Self> {
        let extra_spaces_regex = Regex::new(r"\s+")
            .map_err(|e| EvalError::InvalidConfig(format!("Failed to compile spaces regex: {e}")))?;
        let special_chars_regex = Regex::new(r"[^\w\s가-힣]").map_err(|e| {
            EvalError::InvalidConfig(format!("Failed to compile special chars regex: {e}"))
        })?;

        Ok(Self {
            extra_spaces_regex,
            special_chars_regex,
        })
    }

    /// Normalize `text`. Lossy: punctuation and symbols are dropped.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let collapsed = self.extra_spaces_regex.replace_all(text.trim(), " ");
        let stripped = self.special_chars_regex.replace_all(&collapsed, "");

        self.extra_spaces_regex
            .replace_all(&stripped, " ")
            .trim()
            .to_string()
    }
}

/// Split normalized text into whitespace-separated tokens.
#[must_use]
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Length in characters, as used by the length filter.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_removed() {
        let normalizer = TextNormalizer::new().expect("Failed to create normalizer");
        assert_eq!(
            normalizer.normalize("안녕!!   나는  코딩을  좋아해!!"),
            "안녕 나는 코딩을 좋아해"
        );
    }

    #[test]
    fn test_whitespace_normalization() {
        let normalizer = TextNormalizer::new().expect("Failed to create normalizer");
        assert_eq!(normalizer.normalize("  Too \t many\n\n spaces   "), "Too many spaces");
    }

    #[test]
    fn test_stripping_does_not_leave_double_spaces() {
        let normalizer = TextNormalizer::new().expect("Failed to create normalizer");
        assert_eq!(normalizer.normalize("a - b ."), "a b");
    }

    #[test]
    fn test_blank_text() {
        let normalizer = TextNormalizer::new().expect("Failed to create normalizer");
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("   "), "");
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len("날씨 좋음"), 5);
        assert_eq!("날씨 좋음".len(), 13);
    }
}
