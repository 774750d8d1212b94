//! Consistency check over every dated snapshot under a directory tree.

use std::path::{Path, PathBuf};

use banlist_core::{Snapshot, dates};
use walkdir::WalkDir;

use crate::StoreError;

/// Value range accepted in a regulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// 0, 1 or 2.
    Levels,
    /// Any non-negative integer (Genesys points).
    Points,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub checked: usize,
    pub failures: Vec<Failure>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Check every `YYYY-MM-DD.vector.json` below `root`. Symlinks are not followed.
pub fn validate_tree(root: &Path, rule: ValueRule) -> Result<ValidationReport, StoreError> {
    let mut report = ValidationReport::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| StoreError::Walk(root.to_path_buf(), e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else { continue };
        let Some(expected) = name
            .strip_suffix(".vector.json")
            .and_then(dates::parse_iso)
        else {
            continue;
        };
        report.checked += 1;
        if let Err(reason) = check_file(entry.path(), expected, rule) {
            tracing::error!(path = %entry.path().display(), %reason, "snapshot failed validation");
            report.failures.push(Failure {
                path: entry.path().to_path_buf(),
                reason,
            });
        }
    }
    Ok(report)
}

fn check_file(path: &Path, expected: chrono::NaiveDate, rule: ValueRule) -> Result<(), String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let snapshot: Snapshot = serde_json::from_str(&text).map_err(|e| e.to_string())?;
    if snapshot.date != expected {
        return Err(format!(
            "date {} does not match file name",
            snapshot.date.format("%Y-%m-%d")
        ));
    }
    if rule == ValueRule::Levels
        && let Some((key, value)) = snapshot.regulation.iter().find(|(_, v)| *v > 2)
    {
        return Err(format!("{key}: level {value} outside 0..=2"));
    }
    if let Some((key, _)) = snapshot
        .regulation
        .iter()
        .find(|(k, _)| k.to_string().is_empty())
    {
        return Err(format!("empty card key {key:?}"));
    }
    Ok(())
}
