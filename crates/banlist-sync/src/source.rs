//! The source adapter interface and the lists adapters produce.

use async_trait::async_trait;
use banlist_core::{CardKey, Level, Locale, Matching, Resolver, Sections, Snapshot};
use banlist_store::SnapshotStore;
use chrono::NaiveDate;
use tracing::info;

use crate::SyncError;
use crate::http::FetchClient;

/// What an adapter sees during extraction.
pub struct ExtractContext<'a> {
    pub client: &'a FetchClient,
    /// Output directory, also used for raw artifacts.
    pub store: &'a SnapshotStore,
    /// Wall-clock date of the run. Frozen in tests.
    pub today: NaiveDate,
}

/// Parsed contents of one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    /// Display names with their restriction level, in source order.
    Levels(Vec<(Level, String)>),
    /// Already-canonical IDs with an arbitrary integer value (Genesys points).
    Points(Vec<(u64, u32)>),
}

/// One list effective from `date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedList {
    pub date: NaiveDate,
    /// Distinguishes several lists published for the same date (e.g. `ae`).
    pub variant: Option<&'static str>,
    pub body: ListBody,
}

impl DatedList {
    pub fn levels(date: NaiveDate, names: Vec<(Level, String)>) -> Self {
        Self {
            date,
            variant: None,
            body: ListBody::Levels(names),
        }
    }

    /// Resolve names and build the snapshot. Without a resolver every name
    /// is kept as an unresolved key.
    pub fn to_snapshot(&self, resolver: Option<&Resolver<'_>>) -> Snapshot {
        match &self.body {
            ListBody::Levels(names) => {
                let mut sections = Sections::new();
                for (level, name) in names {
                    let key = match resolver {
                        Some(r) => r.resolve(name),
                        None => CardKey::Unresolved(name.clone()),
                    };
                    info!(date = %self.date, name = %name, ?level, key = %key, "listed");
                    sections.push(*level, key);
                }
                Snapshot::from_sections(self.date, &sections)
            }
            ListBody::Points(points) => Snapshot::new(
                self.date,
                points.iter().map(|(id, p)| (CardKey::Id(*id), *p)).collect(),
            ),
        }
    }
}

/// Everything an adapter extracted in one run.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub lists: Vec<DatedList>,
    /// Dates whose snapshot already exists on disk and was not rebuilt.
    pub reused: Vec<NaiveDate>,
    /// Pretty-printed source response to publish alongside a single current snapshot.
    pub current_raw: Option<String>,
}

/// How a run's snapshots are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publication {
    /// One snapshot for today, written only if it differs from `current`.
    IfChanged,
    /// Every dated snapshot is written, then `current`/`upcoming` are recomputed.
    Dated,
    /// `<date>[.<variant>].name.json` with unresolved names, for later conversion.
    NameLists,
}

/// A regulatory source: fetch + structural parse. Resolution and writing are shared.
#[async_trait]
pub trait Source: Send + Sync {
    /// Short identifier used in logs and errors.
    fn id(&self) -> &'static str;

    /// Locale and matching rules for name resolution, or `None` when the
    /// source already publishes canonical IDs or names are kept raw.
    fn matching(&self) -> Option<(Locale, Matching)>;

    fn publication(&self) -> Publication;

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction, SyncError>;
}
