//! Genesys points list (JSON API, POST form).
//!
//! Cards are already keyed by Konami ID, so no name resolution is needed.
//! The list has no effective date; a snapshot is dated by the run and only
//! written when its content changes.

use async_trait::async_trait;
use banlist_core::{Locale, Matching};
use serde::Deserialize;
use serde_json::Value;

use crate::SyncError;
use crate::source::{DatedList, ExtractContext, Extraction, ListBody, Publication, Source};

const ID: &str = "genesys";
const FORM: &str = "resultsPerPage=20000&currentPage=1";

pub struct Genesys {
    pub url: String,
}

impl Default for Genesys {
    fn default() -> Self {
        Self {
            url: "https://registration.yugioh-card.com/genesys/CardListSearch/PointsList".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PointsPage {
    total_results: u64,
    results_per_page: u64,
    total_pages: u64,
    results: Vec<PointsEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PointsEntry {
    konami_id: u64,
    points: u32,
}

/// Validate the response envelope and pull out `(konami_id, points)` pairs.
///
/// `Success != "Success"` exits with 1; a result set spanning several pages
/// exits with 2 since only the first page was requested.
pub fn parse_points(response: &Value) -> Result<Vec<(u64, u32)>, SyncError> {
    if response.get("Success").and_then(Value::as_str) != Some("Success") {
        return Err(SyncError::Shape {
            source_id: ID,
            detail: format!("request not successful: {response}"),
            exit_code: 1,
        });
    }
    let result = response
        .get("Result")
        .ok_or_else(|| SyncError::parse(ID, "missing Result"))?;
    let page: PointsPage = serde_json::from_value(result.clone())
        .map_err(|e| SyncError::json("genesys Result", e))?;
    if page.total_results > page.results_per_page || page.total_pages > 1 {
        return Err(SyncError::Shape {
            source_id: ID,
            detail: format!(
                "{} results over {} pages do not fit on one page of {}",
                page.total_results, page.total_pages, page.results_per_page
            ),
            exit_code: 2,
        });
    }
    Ok(page
        .results
        .into_iter()
        .map(|e| (e.konami_id, e.points))
        .collect())
}

#[async_trait]
impl Source for Genesys {
    fn id(&self) -> &'static str {
        ID
    }

    fn matching(&self) -> Option<(Locale, Matching)> {
        None
    }

    fn publication(&self) -> Publication {
        Publication::IfChanged
    }

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction, SyncError> {
        let body = ctx.client.post_form(&self.url, FORM).await?;
        let response: Value =
            serde_json::from_str(&body).map_err(|e| SyncError::json("genesys response", e))?;
        let points = parse_points(&response)?;
        let mut raw = serde_json::to_string_pretty(&response)
            .map_err(|e| SyncError::json("genesys response", e))?;
        raw.push('\n');
        Ok(Extraction {
            lists: vec![DatedList {
                date: ctx.today,
                variant: None,
                body: ListBody::Points(points),
            }],
            reused: Vec::new(),
            current_raw: Some(raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use banlist_store::SnapshotStore;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::http::FetchClient;
    use crate::pipeline;

    fn page(total: u64, per_page: u64, pages: u64) -> Value {
        json!({
            "Success": "Success",
            "Result": {
                "TotalResults": total,
                "ResultsPerPage": per_page,
                "TotalPages": pages,
                "CurrentPage": 1,
                "Results": [
                    {"KonamiId": 4007, "Points": 100, "Name": "Pot of Greed"},
                    {"KonamiId": 5000, "Points": 20, "Name": "Amazoness Archer"}
                ]
            }
        })
    }

    #[test]
    fn parses_single_page() {
        let points = parse_points(&page(2, 20000, 1)).unwrap();
        assert_eq!(points, vec![(4007, 100), (5000, 20)]);
    }

    #[test]
    fn unsuccessful_exits_1() {
        let err = parse_points(&json!({"Success": "Failure"})).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn multiple_pages_exit_2() {
        assert_eq!(parse_points(&page(20001, 20000, 2)).unwrap_err().exit_code(), 2);
        assert_eq!(parse_points(&page(2, 20000, 2)).unwrap_err().exit_code(), 2);
    }

    #[tokio::test]
    async fn end_to_end_skips_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/PointsList"))
            .and(body_string(FORM))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(2, 20000, 1)))
            .mount(&server)
            .await;

        let tmp = tempfile::TempDir::new().unwrap();
        let store = SnapshotStore::open(tmp.path()).await.unwrap();
        let client = FetchClient::new(Duration::from_secs(5)).unwrap();
        let source = Genesys {
            url: format!("{}/PointsList", server.uri()),
        };
        let ctx = ExtractContext {
            client: &client,
            store: &store,
            today: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        };

        let first = pipeline::run(&source, &ctx, None).await.unwrap();
        assert!(!first.unchanged);
        let vector: Value = serde_json::from_str(
            &std::fs::read_to_string(tmp.path().join("current.vector.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            vector,
            json!({"date": "2025-06-01", "regulation": {"4007": 100, "5000": 20}})
        );
        assert!(tmp.path().join("2025-06-01.raw.json").exists());

        let later = ExtractContext {
            today: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            ..ctx
        };
        let second = pipeline::run(&source, &later, None).await.unwrap();
        // Same regulation but a new date: still a change.
        assert!(!second.unchanged);

        let third = pipeline::run(&source, &later, None).await.unwrap();
        assert!(third.unchanged);
        assert!(!tmp.path().join("2025-06-03.vector.json").exists());
    }
}
