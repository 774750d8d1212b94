//! Best-effort resolution of display names to canonical card IDs.

use tracing::{debug, warn};

use crate::index::NameIndex;
use crate::normalize;
use crate::regulation::CardKey;

/// Source-specific name matching applied before lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matching {
    /// Names are used verbatim.
    Exact,
    /// Master Duel lists: fullwidth `＜＞` become ASCII.
    AsciiBrackets,
    /// Regional English lists: alias table, then drop a trailing `" (...)"` clarifier.
    ClarifiedEnglish,
    /// Japanese lists: halfwidth → fullwidth, then retry with ideographic spaces.
    HalfwidthJapanese,
    /// Simplified Chinese lists: middle dot, hyphen and space glyphs.
    SimplifiedChinese,
}

impl Matching {
    /// Lookup keys to try, in order.
    pub fn candidates(self, name: &str) -> Vec<String> {
        match self {
            Matching::Exact => vec![name.to_string()],
            Matching::AsciiBrackets => vec![normalize::ascii_brackets(name)],
            Matching::ClarifiedEnglish => {
                let stripped = normalize::strip_clarifier(name);
                vec![normalize::english_alias(stripped).to_string()]
            }
            Matching::HalfwidthJapanese => {
                let fullwidth = normalize::to_fullwidth(name);
                let spaced = normalize::ideographic_spaces(&fullwidth);
                if spaced == fullwidth {
                    vec![fullwidth]
                } else {
                    vec![fullwidth, spaced]
                }
            }
            Matching::SimplifiedChinese => vec![normalize::simplified_chinese(name)],
        }
    }
}

/// Resolves names against one locale's index.
pub struct Resolver<'a> {
    index: &'a NameIndex,
    matching: Matching,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a NameIndex, matching: Matching) -> Self {
        Self { index, matching }
    }

    pub fn matching(&self) -> Matching {
        self.matching
    }

    /// Resolve a display name. Misses fall back to the raw name and are logged.
    pub fn resolve(&self, name: &str) -> CardKey {
        for candidate in self.matching.candidates(name) {
            if let Some(id) = self.index.get(&candidate) {
                debug!(name, id, "resolved card");
                return CardKey::Id(id);
            }
        }
        warn!(name, locale = ?self.index.locale(), "Konami ID not found");
        CardKey::Unresolved(name.to_string())
    }
}
