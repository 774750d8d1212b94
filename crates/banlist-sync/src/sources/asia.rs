//! Asia card list pages, which embed the lists as a JavaScript literal
//! (`const cardData = {...};`) inside the HTML.
//!
//! One page carries both the OCG (Asia) lists and the Asia-English (AE)
//! lists, distinguished by section name.

use async_trait::async_trait;
use banlist_core::{Level, Locale, Matching, dates};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::SyncError;
use crate::source::{DatedList, ExtractContext, Extraction, Publication, Source};

const MARKER: &str = "const cardData = ";

/// Section names of one list family, in level order.
pub type SectionNames = [&'static str; 3];

pub const OCG_SECTIONS: SectionNames = ["Forbidden", "Limited", "Semi-Limited"];
pub const AE_SECTIONS: SectionNames = ["Forbidden (AE)", "Limited (AE)", "Semi-Limited (AE)"];

#[derive(Debug, Deserialize)]
struct CardData {
    en: RegionData,
}

#[derive(Debug, Deserialize)]
struct RegionData {
    effective_dates: Vec<EffectiveDate>,
}

#[derive(Debug, Deserialize)]
struct EffectiveDate {
    effective_date_name: String,
    #[serde(default)]
    card_lists: Vec<CardList>,
}

#[derive(Debug, Deserialize)]
struct CardList {
    card_list_name: String,
    #[serde(default)]
    cards: Vec<ListedCard>,
}

#[derive(Debug, Deserialize)]
struct ListedCard {
    card_name: String,
}

/// All sections published for one effective date.
#[derive(Debug, Clone)]
pub struct EffectiveList {
    pub date: NaiveDate,
    sections: Vec<(String, Vec<String>)>,
}

impl EffectiveList {
    /// Names per level for one list family, or `None` if the date has none
    /// of its sections.
    pub fn levels(&self, names: &SectionNames) -> Option<Vec<(Level, String)>> {
        let mut present = false;
        let mut out = Vec::new();
        for (level, section) in Level::ALL.iter().zip(names) {
            if let Some((_, cards)) = self.sections.iter().find(|(n, _)| n == section) {
                present = true;
                out.extend(cards.iter().map(|c| (*level, c.clone())));
            }
        }
        present.then_some(out)
    }
}

/// The JSON literal between `const cardData = ` and the next `;` line end.
pub fn extract_card_data(html: &str) -> Result<&str, SyncError> {
    let start = html
        .find(MARKER)
        .ok_or_else(|| SyncError::parse("asia page", "no `const cardData = ` literal"))?
        + MARKER.len();
    let rest = &html[start..];
    let end = [";\n", ";\r\n"]
        .iter()
        .filter_map(|t| rest.find(t))
        .min()
        .ok_or_else(|| SyncError::parse("asia page", "unterminated cardData literal"))?;
    Ok(&rest[..end])
}

/// Parse the literal into effective lists sorted by date, newest first
/// (the page itself is not ordered).
pub fn parse_card_data(json: &str) -> Result<Vec<EffectiveList>, SyncError> {
    let data: CardData = serde_json::from_str(json).map_err(|e| SyncError::json("cardData", e))?;
    let mut lists = data
        .en
        .effective_dates
        .into_iter()
        .map(|d| {
            Ok(EffectiveList {
                date: dates::parse_month_year(&d.effective_date_name)?,
                sections: d
                    .card_lists
                    .into_iter()
                    .map(|l| (l.card_list_name, l.cards.into_iter().map(|c| c.card_name).collect()))
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>, SyncError>>()?;
    lists.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(lists)
}

async fn fetch_lists(ctx: &ExtractContext<'_>, url: &str) -> Result<Vec<EffectiveList>, SyncError> {
    let html = ctx.client.get_text(url).await?;
    ctx.store.write_artifact("raw.html", &html).await?;
    let json = extract_card_data(&html)?;
    ctx.store.write_artifact("cardData.json", json).await?;
    parse_card_data(json)
}

/// Asia-English list, resolved against English names.
pub struct AsiaEnglish {
    pub url: String,
}

impl Default for AsiaEnglish {
    fn default() -> Self {
        Self {
            url: "https://www.yugioh-card.com/asia//play/forbidden-and-limited-card-list-ae/".into(),
        }
    }
}

#[async_trait]
impl Source for AsiaEnglish {
    fn id(&self) -> &'static str {
        "asia-ae"
    }

    fn matching(&self) -> Option<(Locale, Matching)> {
        Some((Locale::En, Matching::Exact))
    }

    fn publication(&self) -> Publication {
        Publication::Dated
    }

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction, SyncError> {
        let mut lists = Vec::new();
        for effective in fetch_lists(ctx, &self.url).await? {
            match effective.levels(&AE_SECTIONS) {
                Some(names) => lists.push(DatedList::levels(effective.date, names)),
                None => info!(date = %effective.date, "no AE list"),
            }
        }
        Ok(Extraction {
            lists,
            ..Default::default()
        })
    }
}

/// Both list families as raw name lists (`<date>.name.json`, `<date>.ae.name.json`).
pub struct AsiaNames {
    pub url: String,
}

impl Default for AsiaNames {
    fn default() -> Self {
        Self {
            url: "https://www.yugioh-card.com/asia//play/forbidden-and-limited-list/".into(),
        }
    }
}

#[async_trait]
impl Source for AsiaNames {
    fn id(&self) -> &'static str {
        "asia-names"
    }

    fn matching(&self) -> Option<(Locale, Matching)> {
        None
    }

    fn publication(&self) -> Publication {
        Publication::NameLists
    }

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction, SyncError> {
        let mut lists = Vec::new();
        for effective in fetch_lists(ctx, &self.url).await? {
            info!(date = %effective.date, "effective list");
            if let Some(names) = effective.levels(&OCG_SECTIONS) {
                lists.push(DatedList::levels(effective.date, names));
            }
            if let Some(names) = effective.levels(&AE_SECTIONS) {
                let mut list = DatedList::levels(effective.date, names);
                list.variant = Some("ae");
                lists.push(list);
            }
        }
        Ok(Extraction {
            lists,
            ..Default::default()
        })
    }
}
