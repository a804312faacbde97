//! Token estimation behind a swappable interface

/// Estimates the embedding-model context cost of a text.
///
/// The default is a character-count proxy; a precise tokenizer can replace
/// it without touching chunking logic.
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, text: &str) -> usize;
}

/// Rough estimate: 1 token ~ 4 characters for code
pub struct CharEstimator;

impl TokenEstimator for CharEstimator {
    fn estimate(&self, text: &str) -> usize {
        text.len() / 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_is_floor_of_quarter_length() {
        let est = CharEstimator;
        assert_eq!(est.estimate(""), 0);
        assert_eq!(est.estimate("abc"), 0);
        assert_eq!(est.estimate("abcd"), 1);
        assert_eq!(est.estimate(&"x".repeat(2000)), 500);
    }
}
