//! Reference card database entries (YAML Yugi `cards.json`).

use serde::Deserialize;

use crate::CoreError;

/// Localised display names of a card. Only the locales used for matching are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocalizedNames {
    #[serde(default)]
    pub en: Option<String>,
    /// May embed `<ruby>` phonetic-guide markup.
    #[serde(default)]
    pub ja: Option<String>,
    #[serde(default, rename = "zh-CN")]
    pub zh_cn: Option<String>,
}

/// One entry of the reference card database.
///
/// Cards without a `konami_id` (unreleased, anime-only) are never indexed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardRecord {
    #[serde(default)]
    pub konami_id: Option<u64>,
    #[serde(default)]
    pub name: LocalizedNames,
}

/// Read-only reference card database, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct CardDatabase {
    cards: Vec<CardRecord>,
}

impl CardDatabase {
    pub fn new(cards: Vec<CardRecord>) -> Self {
        Self { cards }
    }

    /// Parse a JSON array of card records.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let cards: Vec<CardRecord> = serde_json::from_str(json).map_err(CoreError::CardDatabase)?;
        Ok(Self { cards })
    }

    pub fn cards(&self) -> &[CardRecord] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
