//! Per-locale name → Konami ID index.

use std::collections::HashMap;

use crate::card::CardDatabase;
use crate::ruby;

/// Locale of the display names a source publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    En,
    Ja,
    ZhCn,
}

/// Lookup table from a locale's display name to the canonical card ID.
///
/// Built once per run and passed explicitly to the resolver. Japanese names
/// are indexed by their ruby base text. On duplicate names the last card wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameIndex {
    locale: Locale,
    ids: HashMap<String, u64>,
}

impl NameIndex {
    pub fn build(db: &CardDatabase, locale: Locale) -> Self {
        let mut ids = HashMap::with_capacity(db.len());
        for card in db.cards() {
            let Some(id) = card.konami_id else { continue };
            let name = match locale {
                Locale::En => card.name.en.clone(),
                Locale::Ja => card.name.ja.as_deref().map(|ja| {
                    if ja.contains("<ruby>") {
                        ruby::base_text(ja)
                    } else {
                        ja.to_string()
                    }
                }),
                Locale::ZhCn => card.name.zh_cn.clone(),
            };
            if let Some(name) = name {
                ids.insert(name, id);
            }
        }
        tracing::debug!(?locale, names = ids.len(), "built name index");
        Self { locale, ids }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
