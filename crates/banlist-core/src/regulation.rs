//! Regulation maps: card key → restriction level (or Genesys points).

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Restriction level. Cards absent from a regulation are unrestricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Forbidden = 0,
    Limited = 1,
    SemiLimited = 2,
}

impl Level {
    /// Processing order when building a regulation from sections.
    pub const ALL: [Level; 3] = [Level::Forbidden, Level::Limited, Level::SemiLimited];

    pub fn value(self) -> u32 {
        self as u32
    }

    pub fn from_value(value: u32) -> Option<Self> {
        match value {
            0 => Some(Level::Forbidden),
            1 => Some(Level::Limited),
            2 => Some(Level::SemiLimited),
            _ => None,
        }
    }
}

/// Key of a regulation entry.
///
/// `Unresolved` keeps the raw display name when the index had no match, so
/// the anomaly stays visible in the output for a human to reconcile.
/// Ordering puts resolved IDs first (numerically), then unresolved names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CardKey {
    Id(u64),
    Unresolved(String),
}

impl CardKey {
    /// Inverse of `Display`: all-digit keys are IDs.
    pub fn parse(key: &str) -> Self {
        if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
            && let Ok(id) = key.parse()
        {
            return CardKey::Id(id);
        }
        CardKey::Unresolved(key.to_string())
    }
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardKey::Id(id) => write!(f, "{id}"),
            CardKey::Unresolved(name) => f.write_str(name),
        }
    }
}

/// A regulation with canonical key order.
///
/// Equal content always serialises to identical bytes, which is what the
/// change detector compares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regulation {
    entries: BTreeMap<CardKey, u32>,
}

impl Regulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from sections applied in the fixed order forbidden → limited →
    /// semi-limited. A key listed in several sections keeps the last level.
    pub fn from_sections(sections: &Sections) -> Self {
        let mut regulation = Self::new();
        for level in Level::ALL {
            for key in sections.get(level) {
                regulation.insert(key.clone(), level.value());
            }
        }
        regulation
    }

    /// Insert or overwrite. Returns the previous value.
    ///
    /// An unresolved name made only of digits would serialise to the same
    /// JSON key as an ID, so it is stored as that ID.
    pub fn insert(&mut self, key: CardKey, value: u32) -> Option<u32> {
        let key = match key {
            CardKey::Unresolved(name) => {
                let parsed = CardKey::parse(&name);
                if let CardKey::Id(id) = parsed {
                    warn!(name = %name, id, "unresolved name reads as a card ID");
                }
                parsed
            }
            id => id,
        };
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &CardKey) -> Option<u32> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CardKey, u32)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    /// Keys that could not be resolved to a canonical ID.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().filter_map(|k| match k {
            CardKey::Unresolved(name) => Some(name.as_str()),
            CardKey::Id(_) => None,
        })
    }
}

impl FromIterator<(CardKey, u32)> for Regulation {
    fn from_iter<I: IntoIterator<Item = (CardKey, u32)>>(iter: I) -> Self {
        let mut regulation = Self::new();
        for (key, value) in iter {
            regulation.insert(key, value);
        }
        regulation
    }
}

impl Serialize for Regulation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Regulation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RegulationVisitor;

        impl<'de> Visitor<'de> for RegulationVisitor {
            type Value = Regulation;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of card keys to non-negative integers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Regulation, A::Error> {
                let mut regulation = Regulation::new();
                while let Some((key, value)) = access.next_entry::<String, u32>()? {
                    if regulation.insert(CardKey::parse(&key), value).is_some() {
                        return Err(de::Error::custom(format!("duplicate card key {key:?}")));
                    }
                }
                Ok(regulation)
            }
        }

        deserializer.deserialize_map(RegulationVisitor)
    }
}

/// Card keys grouped by restriction level, in source order.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    forbidden: Vec<CardKey>,
    limited: Vec<CardKey>,
    semi_limited: Vec<CardKey>,
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: Level, key: CardKey) {
        match level {
            Level::Forbidden => self.forbidden.push(key),
            Level::Limited => self.limited.push(key),
            Level::SemiLimited => self.semi_limited.push(key),
        }
    }

    pub fn get(&self, level: Level) -> &[CardKey] {
        match level {
            Level::Forbidden => &self.forbidden,
            Level::Limited => &self.limited,
            Level::SemiLimited => &self.semi_limited,
        }
    }

    pub fn is_empty(&self) -> bool {
        Level::ALL.iter().all(|l| self.get(*l).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_key_display_and_parse() {
        assert_eq!(CardKey::Id(4007).to_string(), "4007");
        assert_eq!(CardKey::parse("4007"), CardKey::Id(4007));
        assert_eq!(
            CardKey::parse("Mystery Card"),
            CardKey::Unresolved("Mystery Card".into())
        );
        assert_eq!(CardKey::parse(""), CardKey::Unresolved(String::new()));
        assert_eq!(CardKey::parse("-1"), CardKey::Unresolved("-1".into()));
    }

    #[test]
    fn level_values() {
        assert_eq!(Level::Forbidden.value(), 0);
        assert_eq!(Level::Limited.value(), 1);
        assert_eq!(Level::SemiLimited.value(), 2);
        assert_eq!(Level::from_value(2), Some(Level::SemiLimited));
        assert_eq!(Level::from_value(3), None);
    }

    #[test]
    fn overlapping_sections_last_category_wins() {
        let mut sections = Sections::new();
        sections.push(Level::Limited, CardKey::Id(1));
        sections.push(Level::Forbidden, CardKey::Id(1));
        sections.push(Level::Forbidden, CardKey::Id(2));
        sections.push(Level::SemiLimited, CardKey::Id(2));
        sections.push(Level::Forbidden, CardKey::Id(3));

        let regulation = Regulation::from_sections(&sections);
        assert_eq!(regulation.get(&CardKey::Id(1)), Some(1));
        assert_eq!(regulation.get(&CardKey::Id(2)), Some(2));
        assert_eq!(regulation.get(&CardKey::Id(3)), Some(0));
        assert_eq!(regulation.len(), 3);
    }

    #[test]
    fn canonical_order_ignores_insertion_order() {
        let a: Regulation = [
            (CardKey::Unresolved("Zeta".into()), 1),
            (CardKey::Id(100), 0),
            (CardKey::Id(20), 2),
        ]
        .into_iter()
        .collect();
        let b: Regulation = [
            (CardKey::Id(20), 2),
            (CardKey::Id(100), 0),
            (CardKey::Unresolved("Zeta".into()), 1),
        ]
        .into_iter()
        .collect();
        let ja = serde_json::to_string(&a).unwrap();
        assert_eq!(ja, serde_json::to_string(&b).unwrap());
        // Numeric, not lexicographic, ordering of IDs.
        assert_eq!(ja, r#"{"20":2,"100":0,"Zeta":1}"#);
    }

    #[test]
    fn deserialize_rejects_duplicate_keys() {
        let err = serde_json::from_str::<Regulation>(r#"{"1":0,"1":1}"#).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn digit_only_name_shares_the_id_key() {
        let mut sections = Sections::new();
        sections.push(Level::Forbidden, CardKey::Id(123));
        sections.push(Level::Limited, CardKey::Unresolved("123".into()));
        let regulation = Regulation::from_sections(&sections);
        assert_eq!(regulation.len(), 1);
        assert_eq!(regulation.get(&CardKey::Id(123)), Some(1));

        let json = serde_json::to_string(&regulation).unwrap();
        assert_eq!(json, r#"{"123":1}"#);
        assert_eq!(serde_json::from_str::<Regulation>(&json).unwrap(), regulation);
    }

    #[test]
    fn unresolved_iterator() {
        let r: Regulation = [
            (CardKey::Id(1), 0),
            (CardKey::Unresolved("Mystery Card".into()), 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(r.unresolved().collect::<Vec<_>>(), vec!["Mystery Card"]);
    }
}
