//! Output directory holding dated snapshots, raw source artifacts and the
//! `current` / `upcoming` symlinks.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use banlist_core::{Pointers, Snapshot, dates, select_pointers, vector_file_name};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::StoreError;

const VECTOR_SUFFIX: &str = ".vector.json";

/// Mutable symlinks recomputed on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Current,
    Upcoming,
    /// Raw response behind the current snapshot (single-snapshot sources).
    CurrentRaw,
}

impl Pointer {
    pub fn file_name(self) -> &'static str {
        match self {
            Pointer::Current => "current.vector.json",
            Pointer::Upcoming => "upcoming.vector.json",
            Pointer::CurrentRaw => "current.raw.json",
        }
    }
}

/// Result of [`SnapshotStore::publish_current`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publish {
    /// Content equals the current snapshot; nothing was written.
    Unchanged,
    Written { snapshot: PathBuf, raw: PathBuf },
}

/// Directory of snapshot files.
///
/// Dated files are only ever created or overwritten whole; re-running on the
/// same day overwrites that day's files. Pointers are relative symlinks so the
/// directory can be moved or published as-is.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open an output directory, creating it if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    pub async fn exists(&self, file: &str) -> bool {
        tokio::fs::try_exists(self.path(file)).await.unwrap_or(false)
    }

    // ── Writes ──

    /// Write an unmodified source response for audit.
    pub async fn write_artifact(
        &self,
        file: &str,
        contents: impl AsRef<[u8]>,
    ) -> Result<PathBuf, StoreError> {
        let path = self.path(file);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        info!(path = %path.display(), "wrote artifact");
        Ok(path)
    }

    /// Write any serialisable value as two-space indented JSON with a trailing newline.
    pub async fn write_json<T: Serialize + ?Sized>(
        &self,
        file: &str,
        value: &T,
    ) -> Result<PathBuf, StoreError> {
        let path = self.path(file);
        let mut json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        json.push('\n');
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        info!(path = %path.display(), "wrote json");
        Ok(path)
    }

    /// Write `<date>.vector.json`.
    pub async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<PathBuf, StoreError> {
        let path = self.path(&snapshot.file_name());
        tokio::fs::write(&path, snapshot.to_canonical_json()?)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        info!(
            path = %path.display(),
            entries = snapshot.regulation.len(),
            "wrote snapshot"
        );
        Ok(path)
    }

    // ── Reads ──

    pub async fn read_to_string(&self, file: &str) -> Result<String, StoreError> {
        let path = self.path(file);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))
    }

    pub async fn read_snapshot(&self, file: &str) -> Result<Snapshot, StoreError> {
        let text = self.read_to_string(file).await?;
        serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: self.path(file),
            source,
        })
    }

    /// File names in the directory ending with `suffix`, sorted.
    pub async fn list_files(&self, suffix: &str) -> Result<Vec<String>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?;
        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?
        {
            if let Some(name) = entry.file_name().to_str()
                && name.ends_with(suffix)
            {
                files.push(name.to_string());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Dates of every `YYYY-MM-DD.vector.json` in the directory, descending.
    pub async fn snapshot_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let mut found: Vec<NaiveDate> = self
            .list_files(VECTOR_SUFFIX)
            .await?
            .iter()
            .filter_map(|f| dates::parse_iso(f.trim_end_matches(VECTOR_SUFFIX)))
            .collect();
        found.sort_unstable_by(|a, b| b.cmp(a));
        Ok(found)
    }

    // ── Change detection ──

    /// Compare serialised content against the current snapshot.
    ///
    /// A missing or unreadable current snapshot counts as changed.
    pub async fn has_changed(&self, canonical_json: &str) -> bool {
        match self.read_to_string(Pointer::Current.file_name()).await {
            Ok(previous) => previous != canonical_json,
            Err(e) => {
                warn!(error = %e, "no readable current snapshot");
                true
            }
        }
    }

    /// Single-snapshot publication: skip everything when unchanged, otherwise
    /// write the raw response and the snapshot and repoint both `current` links.
    pub async fn publish_current(
        &self,
        snapshot: &Snapshot,
        raw: impl AsRef<[u8]>,
    ) -> Result<Publish, StoreError> {
        let json = snapshot.to_canonical_json()?;
        if !self.has_changed(&json).await {
            info!("No changes.");
            return Ok(Publish::Unchanged);
        }

        let raw_file = format!("{}.raw.json", snapshot.date.format("%Y-%m-%d"));
        let raw = self.write_artifact(&raw_file, raw).await?;
        self.point(Pointer::CurrentRaw, &raw_file).await?;

        let snapshot_path = self.write_snapshot(snapshot).await?;
        self.point(Pointer::Current, &snapshot.file_name()).await?;

        Ok(Publish::Written {
            snapshot: snapshot_path,
            raw,
        })
    }

    // ── Pointers ──

    /// Replace a pointer symlink with one targeting `target` (a file in this directory).
    pub async fn point(&self, pointer: Pointer, target: &str) -> Result<(), StoreError> {
        self.clear(pointer).await?;
        let link = self.path(pointer.file_name());
        symlink(target, &link)
            .await
            .map_err(|e| StoreError::io(&link, e))?;
        info!(link = pointer.file_name(), target, "updated pointer");
        Ok(())
    }

    /// Remove a pointer symlink. A missing link is not an error.
    pub async fn clear(&self, pointer: Pointer) -> Result<(), StoreError> {
        let link = self.path(pointer.file_name());
        match tokio::fs::remove_file(&link).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&link, e)),
        }
    }

    /// Point `current` at the latest list in effect and `upcoming` at the
    /// nearest future list, removing `upcoming` when there is none.
    pub async fn update_pointers(
        &self,
        known: &[NaiveDate],
        today: NaiveDate,
    ) -> Result<Pointers, StoreError> {
        let pointers = select_pointers(known, today);
        info!(
            current = ?pointers.current,
            upcoming = ?pointers.upcoming,
            "selected pointers"
        );
        match pointers.current {
            Some(date) => self.point(Pointer::Current, &vector_file_name(date)).await?,
            None => warn!("no list is in effect yet; current pointer left unchanged"),
        }
        match pointers.upcoming {
            Some(date) => self.point(Pointer::Upcoming, &vector_file_name(date)).await?,
            None => self.clear(Pointer::Upcoming).await?,
        }
        Ok(pointers)
    }
}

#[cfg(unix)]
async fn symlink(target: &str, link: &Path) -> std::io::Result<()> {
    tokio::fs::symlink(target, link).await
}

#[cfg(windows)]
async fn symlink(target: &str, link: &Path) -> std::io::Result<()> {
    tokio::fs::symlink_file(target, link).await
}
