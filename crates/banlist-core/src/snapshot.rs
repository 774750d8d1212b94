//! Dated regulation snapshots (`<date>.vector.json`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CoreError;
use crate::regulation::{Regulation, Sections};

/// The regulation in effect from `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub regulation: Regulation,
}

impl Snapshot {
    pub fn new(date: NaiveDate, regulation: Regulation) -> Self {
        Self { date, regulation }
    }

    pub fn from_sections(date: NaiveDate, sections: &Sections) -> Self {
        Self::new(date, Regulation::from_sections(sections))
    }

    /// Canonical on-disk form: two-space indented JSON with a trailing newline.
    pub fn to_canonical_json(&self) -> Result<String, CoreError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// `YYYY-MM-DD.vector.json`
    pub fn file_name(&self) -> String {
        vector_file_name(self.date)
    }
}

pub fn vector_file_name(date: NaiveDate) -> String {
    format!("{}.vector.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regulation::{CardKey, Level};

    fn jan_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn canonical_json_layout() {
        let mut sections = Sections::new();
        sections.push(Level::Forbidden, CardKey::Id(123));
        let snapshot = Snapshot::from_sections(jan_first(), &sections);
        assert_eq!(
            snapshot.to_canonical_json().unwrap(),
            "{\n  \"date\": \"2025-01-01\",\n  \"regulation\": {\n    \"123\": 0\n  }\n}\n"
        );
        assert_eq!(snapshot.file_name(), "2025-01-01.vector.json");
    }

    #[test]
    fn empty_regulation_serialises_as_empty_object() {
        let snapshot = Snapshot::new(jan_first(), Regulation::new());
        assert_eq!(
            snapshot.to_canonical_json().unwrap(),
            "{\n  \"date\": \"2025-01-01\",\n  \"regulation\": {}\n}\n"
        );
    }

    #[test]
    fn parses_written_form() {
        let json = r#"{"date": "2025-01-01", "regulation": {"123": 0, "Mystery Card": 1}}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.date, jan_first());
        assert_eq!(snapshot.regulation.get(&CardKey::Id(123)), Some(0));
        assert_eq!(
            snapshot
                .regulation
                .get(&CardKey::Unresolved("Mystery Card".into())),
            Some(1)
        );
    }
}
