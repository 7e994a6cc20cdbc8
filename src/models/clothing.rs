use crate::error::{HavaError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clothing {
    pub id: String,
    pub description_fa: String,
    /// Search phrase for looking the item up in English-language shops
    pub english_phrase: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClothingDraft {
    pub description_fa: String,
    pub english_phrase: Option<String>,
}

impl ClothingDraft {
    pub fn new(description_fa: impl Into<String>) -> Self {
        Self {
            description_fa: description_fa.into(),
            english_phrase: None,
        }
    }

    pub fn validated(mut self) -> Result<Self> {
        self.description_fa = self.description_fa.trim().to_string();
        if self.description_fa.is_empty() {
            return Err(HavaError::Validation(
                "description_fa must not be empty".into(),
            ));
        }
        self.english_phrase = self
            .english_phrase
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        Ok(self)
    }
}

impl From<&Clothing> for ClothingDraft {
    fn from(clothing: &Clothing) -> Self {
        Self {
            description_fa: clothing.description_fa.clone(),
            english_phrase: clothing.english_phrase.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_description_is_rejected() {
        assert!(matches!(
            ClothingDraft::new("\n").validated(),
            Err(HavaError::Validation(_))
        ));
    }

    #[test]
    fn empty_english_phrase_becomes_none() {
        let draft = ClothingDraft {
            description_fa: "بارانی".into(),
            english_phrase: Some("  ".into()),
        }
        .validated()
        .unwrap();
        assert!(draft.english_phrase.is_none());
    }
}
