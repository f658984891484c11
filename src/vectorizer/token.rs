use std::collections::HashSet;

/// Token stream preparation ahead of stemming.
///
/// Splits raw text on every non-alphanumeric byte, lowercases, and drops what
/// the pipeline never wants to see: tokens shorter than two characters,
/// stop words, and anything containing a digit. Stop-word lists themselves
/// come from the caller; this type only applies them.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stop_words: HashSet<Box<str>>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            stop_words: HashSet::new(),
        }
    }

    /// Build a tokenizer with a stop-word set.
    pub fn with_stop_words<I, T>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|w| Box::from(w.as_ref().to_ascii_lowercase().as_str()))
                .collect(),
        }
    }

    /// Lowercased, filtered tokens of `text`, in document order.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|raw| raw.len() >= 2)
            .map(|raw| raw.to_ascii_lowercase())
            .filter(|tok| !tok.bytes().any(|b| b.is_ascii_digit()))
            .filter(|tok| !self.stop_words.contains(tok.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_punctuation() {
        let t = Tokenizer::new();
        assert_eq!(
            t.tokens("The quick, brown-fox (jumps)."),
            vec!["the", "quick", "brown", "fox", "jumps"]
        );
    }

    #[test]
    fn test_drops_short_and_numeric_tokens() {
        let t = Tokenizer::new();
        assert_eq!(t.tokens("a I b2b 42 ok"), vec!["ok"]);
    }

    #[test]
    fn test_stop_words_removed_case_insensitively() {
        let t = Tokenizer::with_stop_words(["the", "AND"]);
        assert_eq!(t.tokens("The cat AND the dog"), vec!["cat", "dog"]);
    }
}
