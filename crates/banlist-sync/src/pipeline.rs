//! Shared run loop: extract → resolve → publish.

use std::path::PathBuf;

use banlist_core::{CardDatabase, NameIndex, Pointers, Resolver};
use banlist_store::Publish;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::SyncError;
use crate::source::{ExtractContext, Publication, Source};

/// Summary of one run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<PathBuf>,
    /// Snapshot content matched the current one; nothing was written.
    pub unchanged: bool,
    /// Names that fell back to raw display names, across all lists.
    pub unresolved: usize,
    pub pointers: Option<Pointers>,
}

/// Run a source end to end.
///
/// The name index is built once here, from `cards`, and passed to the
/// resolver. Sources that resolve names fail early without `cards`.
pub async fn run(
    source: &dyn Source,
    ctx: &ExtractContext<'_>,
    cards: Option<&CardDatabase>,
) -> Result<RunReport, SyncError> {
    let index = match source.matching() {
        Some((locale, _)) => {
            let cards = cards.ok_or(SyncError::MissingCards {
                source_id: source.id(),
            })?;
            let index = NameIndex::build(cards, locale);
            info!(source = source.id(), names = index.len(), "name index ready");
            Some(index)
        }
        None => None,
    };
    let resolver = match (&index, source.matching()) {
        (Some(index), Some((_, matching))) => Some(Resolver::new(index, matching)),
        _ => None,
    };

    let extraction = source.extract(ctx).await?;
    info!(
        source = source.id(),
        lists = extraction.lists.len(),
        reused = extraction.reused.len(),
        "extracted"
    );

    let mut report = RunReport::default();
    match source.publication() {
        Publication::IfChanged => {
            let list = extraction.lists.first().ok_or_else(|| {
                SyncError::parse(source.id(), "source produced no list")
            })?;
            let snapshot = list.to_snapshot(resolver.as_ref());
            report.unresolved = snapshot.regulation.unresolved().count();
            let raw = extraction.current_raw.unwrap_or_default();
            match ctx.store.publish_current(&snapshot, raw).await? {
                Publish::Unchanged => report.unchanged = true,
                Publish::Written { snapshot, raw } => {
                    report.written.push(raw);
                    report.written.push(snapshot);
                }
            }
        }
        Publication::Dated => {
            let mut known: Vec<NaiveDate> = extraction.reused.clone();
            for list in &extraction.lists {
                let snapshot = list.to_snapshot(resolver.as_ref());
                report.unresolved += snapshot.regulation.unresolved().count();
                report.written.push(ctx.store.write_snapshot(&snapshot).await?);
                known.push(list.date);
            }
            if known.is_empty() {
                warn!(source = source.id(), "no lists found; pointers left unchanged");
            } else {
                report.pointers = Some(ctx.store.update_pointers(&known, ctx.today).await?);
            }
        }
        Publication::NameLists => {
            for list in &extraction.lists {
                let snapshot = list.to_snapshot(None);
                let date = list.date.format("%Y-%m-%d");
                let file = match list.variant {
                    Some(variant) => format!("{date}.{variant}.name.json"),
                    None => format!("{date}.name.json"),
                };
                report.written.push(ctx.store.write_json(&file, &snapshot).await?);
            }
        }
    }

    if report.unresolved > 0 {
        warn!(
            source = source.id(),
            unresolved = report.unresolved,
            "some names were not found in the card database"
        );
    }
    Ok(report)
}
