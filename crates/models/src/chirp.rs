use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Maximum chirp length, counted in characters of the raw body.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Words replaced by [`CENSORED`] when they appear as a whole word.
pub const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

pub const CENSORED: &str = "****";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: u64,
    pub author_id: u64,
    pub body: String,
}

/// Check a raw chirp body before any filtering is applied. Only the length
/// is checked; an empty body is a valid chirp.
pub fn validate_body(body: &str) -> Result<(), ModelError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ModelError::Validation("Chirp is too long".into()));
    }
    Ok(())
}

/// Replace profane words. Words are split on single spaces, so a word with
/// punctuation attached (`"fornax!"`) is left alone.
pub fn censor(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            if PROFANE_WORDS.contains(&lower.as_str()) {
                CENSORED
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn censor_replaces_any_case() {
        assert_eq!(
            censor("I had something interesting for breakfast Sharbert KERFUFFLE fornax"),
            "I had something interesting for breakfast **** **** ****"
        );
    }

    #[test]
    fn censor_keeps_punctuated_words_and_spacing() {
        assert_eq!(censor("Sharbert! is  fine"), "Sharbert! is  fine");
        assert_eq!(censor("plain text"), "plain text");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let exactly = "é".repeat(MAX_CHIRP_LENGTH);
        assert!(validate_body(&exactly).is_ok());
        let over = "a".repeat(MAX_CHIRP_LENGTH + 1);
        assert!(matches!(validate_body(&over), Err(ModelError::Validation(_))));
    }

    #[test]
    fn empty_body_is_accepted() {
        assert!(validate_body("").is_ok());
        assert!(validate_body("   ").is_ok());
    }
}
