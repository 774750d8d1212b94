//! Hong Kong regional mirror of the OCG lists (Japan and Asia-English regions).
//!
//! An index page links every published month; each month is available as a
//! CSV file and as an HTML page with one table per section.

use async_trait::async_trait;
use banlist_core::{Level, Locale, Matching, dates, vector_file_name};
use chrono::NaiveDate;
use futures::future::try_join_all;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::SyncError;
use crate::source::{DatedList, ExtractContext, Extraction, Publication, Source};

/// Regional list selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Jp,
    Ae,
}

impl Region {
    pub fn index_page(self) -> &'static str {
        match self {
            Region::Jp => "forbidden_cardlist",
            Region::Ae => "forbidden_cardlist_aen",
        }
    }

    pub fn csv_dir(self) -> &'static str {
        match self {
            Region::Jp => "forbidden_card_lists",
            Region::Ae => "forbidden_card_lists_aen",
        }
    }

    fn matching(self) -> (Locale, Matching) {
        match self {
            Region::Jp => (Locale::Ja, Matching::HalfwidthJapanese),
            Region::Ae => (Locale::En, Matching::ClarifiedEnglish),
        }
    }
}

/// Per-month representation to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Html,
}

/// CSV category labels. `解除` (released) rows are skipped.
const LABELS: &[(&str, Option<Level>)] = &[
    ("禁止", Some(Level::Forbidden)),
    ("制限", Some(Level::Limited)),
    ("準制限", Some(Level::SemiLimited)),
    ("解除", None),
];

/// Section element ids on the monthly HTML page, in processing order.
///
/// The page's ids for the limited and semi-limited tables are swapped
/// relative to their headings: `#semi_limited` holds the limited cards and
/// `#limited` the semi-limited ones.
pub const TABLE_SECTIONS: &[(&str, Level)] = &[
    ("forbidden", Level::Forbidden),
    ("semi_limited", Level::Limited),
    ("limited", Level::SemiLimited),
];

/// Zero-based column of the card name in CSV lines and table rows.
const NAME_COLUMN: usize = 2;

fn selector(css: &str) -> Result<Selector, SyncError> {
    Selector::parse(css).map_err(|e| SyncError::parse("selector", format!("{css}: {e}")))
}

/// Months linked from the index page, in page order (newest first).
pub fn parse_index(html: &str) -> Result<Vec<u32>, SyncError> {
    let doc = Html::parse_document(html);
    let links = selector("a.to_event")?;
    let mut months = Vec::new();
    for a in doc.select(&links) {
        let href = a
            .value()
            .attr("href")
            .ok_or_else(|| SyncError::parse("hk index", "a.to_event without href"))?;
        let digits: String = href
            .get(6..)
            .unwrap_or("")
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let yyyymm = digits
            .parse()
            .map_err(|_| SyncError::parse("hk index", format!("no month in href {href:?}")))?;
        months.push(yyyymm);
    }
    if months.is_empty() {
        return Err(SyncError::parse("hk index", "no a.to_event links"));
    }
    Ok(months)
}

/// Parse a monthly CSV body.
///
/// Lines starting with `$` (headers) or `,` (continuations) and blank lines
/// are skipped. Columns are `label,_,name`. Rows with an unrecognised label
/// are logged and skipped: files from 2021-04 and earlier are Shift_JIS and
/// their labels do not survive UTF-8 decoding.
pub fn parse_csv(context: &str, body: &str) -> Result<Vec<(Level, String)>, SyncError> {
    let mut out = Vec::new();
    for line in body.split('\n') {
        let line = line.trim_end_matches('\r');
        if line.starts_with('$') || line.starts_with(',') || line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split(',').collect();
        let label = columns[0];
        let name = columns
            .get(NAME_COLUMN)
            .ok_or_else(|| SyncError::parse(context, format!("short line {line:?}")))?;
        match LABELS.iter().find(|(l, _)| *l == label) {
            Some((_, Some(level))) => out.push((*level, name.to_string())),
            Some((_, None)) => debug!(context, label, name, "skip released"),
            None => warn!(context, label, name, "skip unrecognised label"),
        }
    }
    Ok(out)
}

/// Parse a monthly HTML page using [`TABLE_SECTIONS`].
pub fn parse_tables(context: &str, html: &str) -> Result<Vec<(Level, String)>, SyncError> {
    let doc = Html::parse_document(html);
    let cell = selector("td")?;
    let rows = selector("tr")?;
    let mut out = Vec::new();
    for (id, level) in TABLE_SECTIONS {
        let section = selector(&format!("#{id}"))?;
        let table = doc
            .select(&section)
            .next()
            .ok_or_else(|| SyncError::parse(context, format!("missing section #{id}")))?;
        for row in table.select(&rows) {
            let cells: Vec<_> = row.select(&cell).collect();
            if cells.is_empty() {
                // Header row.
                continue;
            }
            let name = cells
                .get(NAME_COLUMN)
                .map(|c| c.text().collect::<String>().trim().to_string())
                .ok_or_else(|| {
                    SyncError::parse(context, format!("#{id} row has {} cells", cells.len()))
                })?;
            if name.is_empty() {
                return Err(SyncError::parse(context, format!("#{id} row has an empty name")));
            }
            out.push((*level, name));
        }
    }
    Ok(out)
}

pub struct HongKong {
    pub base_url: String,
    pub region: Region,
    pub format: Format,
    /// Only the two most recent months: the current list is always one of them.
    pub recent_only: bool,
}

impl HongKong {
    pub fn new(region: Region, format: Format, recent_only: bool) -> Self {
        Self {
            base_url: "https://www.yugioh-card.com/hk".into(),
            region,
            format,
            recent_only,
        }
    }

    fn index_url(&self) -> String {
        format!(
            "{}/event/rules_guides/{}.php",
            self.base_url,
            self.region.index_page()
        )
    }

    async fn month(
        &self,
        ctx: &ExtractContext<'_>,
        yyyymm: u32,
    ) -> Result<(NaiveDate, Option<Vec<(Level, String)>>), SyncError> {
        let date = dates::from_yyyymm(yyyymm)?;
        let context = format!("{}/{yyyymm}", self.region.csv_dir());
        match self.format {
            Format::Csv => {
                let file = format!("{yyyymm}.csv");
                // A CSV without its snapshot is left over from an aborted run.
                if ctx.store.exists(&file).await
                    && ctx.store.exists(&vector_file_name(date)).await
                {
                    info!(file = %file, "already converted");
                    return Ok((date, None));
                }
                let url = format!("{}/data/{}/{file}", self.base_url, self.region.csv_dir());
                let raw = ctx.client.get_bytes(&url).await?;
                ctx.store.write_artifact(&file, &raw).await?;
                let body = String::from_utf8_lossy(&raw);
                Ok((date, Some(parse_csv(&context, &body)?)))
            }
            Format::Html => {
                let file = format!("{yyyymm}.html");
                let url = format!("{}?list={yyyymm}", self.index_url());
                let html = ctx.client.get_text(&url).await?;
                ctx.store.write_artifact(&file, &html).await?;
                Ok((date, Some(parse_tables(&context, &html)?)))
            }
        }
    }
}

#[async_trait]
impl Source for HongKong {
    fn id(&self) -> &'static str {
        "hk"
    }

    fn matching(&self) -> Option<(Locale, Matching)> {
        Some(self.region.matching())
    }

    fn publication(&self) -> Publication {
        Publication::Dated
    }

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction, SyncError> {
        let index = ctx.client.get_text(&self.index_url()).await?;
        let mut months = parse_index(&index)?;
        if self.recent_only {
            months.truncate(2);
        }
        info!(region = ?self.region, months = months.len(), "index");

        let results = try_join_all(months.iter().map(|m| self.month(ctx, *m))).await?;
        let mut extraction = Extraction::default();
        for (date, names) in results {
            match names {
                Some(names) => extraction.lists.push(DatedList::levels(date, names)),
                None => extraction.reused.push(date),
            }
        }
        Ok(extraction)
    }
}
