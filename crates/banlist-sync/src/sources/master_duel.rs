//! Master Duel lists, transcribed by hand into `<YYYY-MM-DD>.name.json`
//! files in the output directory.
//!
//! A file is either a flat `{"<name>": level}` map or a name snapshot
//! (`{"date": ..., "regulation": {...}}`, as written by `asia-names`).

use async_trait::async_trait;
use banlist_core::{Level, Locale, Matching, dates};
use serde_json::Value;
use tracing::{debug, info};

use crate::SyncError;
use crate::source::{DatedList, ExtractContext, Extraction, Publication, Source};

const NAME_SUFFIX: &str = ".name.json";

/// Read one name file. `file` is only used for error context.
pub fn parse_name_file(file: &str, json: &str) -> Result<Vec<(Level, String)>, SyncError> {
    let value: Value = serde_json::from_str(json).map_err(|e| SyncError::json(file, e))?;
    let map = match value.get("regulation") {
        Some(Value::Object(regulation)) => regulation,
        Some(_) => return Err(SyncError::parse(file, "`regulation` is not an object")),
        None => value
            .as_object()
            .ok_or_else(|| SyncError::parse(file, "expected a JSON object"))?,
    };
    map.iter()
        .map(|(name, level)| {
            let level = level
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .and_then(Level::from_value)
                .ok_or_else(|| SyncError::parse(file, format!("bad level {level} for {name:?}")))?;
            Ok((level, name.clone()))
        })
        .collect()
}

pub struct MasterDuel;

#[async_trait]
impl Source for MasterDuel {
    fn id(&self) -> &'static str {
        "master-duel"
    }

    fn matching(&self) -> Option<(Locale, Matching)> {
        Some((Locale::En, Matching::AsciiBrackets))
    }

    fn publication(&self) -> Publication {
        Publication::Dated
    }

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction, SyncError> {
        let mut lists = Vec::new();
        for file in ctx.store.list_files(NAME_SUFFIX).await? {
            // Variant files such as `<date>.ae.name.json` belong to other lists.
            let Some(date) = dates::parse_iso(file.trim_end_matches(NAME_SUFFIX)) else {
                debug!(file = %file, "skipping");
                continue;
            };
            let json = ctx.store.read_to_string(&file).await?;
            let names = parse_name_file(&file, &json)?;
            info!(file = %file, cards = names.len(), "read name list");
            lists.push(DatedList::levels(date, names));
        }
        lists.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(Extraction {
            lists,
            ..Default::default()
        })
    }
}
