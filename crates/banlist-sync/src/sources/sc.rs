//! Simplified Chinese lists from the regional regulation API.

use async_trait::async_trait;
use banlist_core::{Level, Locale, Matching, dates};
use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::Deserialize;

use crate::SyncError;
use crate::source::{DatedList, ExtractContext, Extraction, Publication, Source};

#[derive(Debug, Deserialize)]
struct WebList {
    list: Vec<WebListItem>,
}

#[derive(Debug, Deserialize)]
struct WebListItem {
    id: u64,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct WebInfo {
    name: String,
    list: Vec<Group>,
}

#[derive(Debug, Deserialize)]
struct Group {
    #[serde(default)]
    list: Vec<GroupCard>,
}

#[derive(Debug, Deserialize)]
struct GroupCard {
    name: String,
}

/// Parse one `webinfo` document. Its first three groups are the forbidden,
/// limited and semi-limited cards; later groups are ignored.
pub fn parse_web_info(context: &str, json: &str) -> Result<DatedList, SyncError> {
    let info: WebInfo = serde_json::from_str(json).map_err(|e| SyncError::json(context, e))?;
    let date: NaiveDate = dates::parse_labelled_year_month(&info.name)?;
    let names = Level::ALL
        .iter()
        .zip(&info.list)
        .flat_map(|(level, group)| group.list.iter().map(|c| (*level, c.name.clone())))
        .collect();
    Ok(DatedList::levels(date, names))
}

pub struct SimplifiedChinese {
    pub base_url: String,
}

impl Default for SimplifiedChinese {
    fn default() -> Self {
        Self {
            base_url: "https://gamekingapi.windoent.com/forbidden/forbbidengroup".into(),
        }
    }
}

impl SimplifiedChinese {
    async fn detail(&self, ctx: &ExtractContext<'_>, id: u64) -> Result<DatedList, SyncError> {
        let body = ctx
            .client
            .get_json_text(&format!("{}/webinfo/{id}", self.base_url))
            .await?;
        let file = format!("{id}.json");
        ctx.store.write_artifact(&file, &body).await?;
        parse_web_info(&file, &body)
    }
}

#[async_trait]
impl Source for SimplifiedChinese {
    fn id(&self) -> &'static str {
        "sc"
    }

    fn matching(&self) -> Option<(Locale, Matching)> {
        Some((Locale::ZhCn, Matching::SimplifiedChinese))
    }

    fn publication(&self) -> Publication {
        Publication::Dated
    }

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction, SyncError> {
        let body = ctx
            .client
            .get_json_text(&format!("{}/webList?type=2", self.base_url))
            .await?;
        ctx.store.write_artifact("webList.json", &body).await?;
        let web_list: WebList =
            serde_json::from_str(&body).map_err(|e| SyncError::json("webList.json", e))?;
        for item in &web_list.list {
            tracing::debug!(id = item.id, name = %item.name, "listed regulation");
        }

        let mut lists = try_join_all(web_list.list.iter().map(|item| self.detail(ctx, item.id))).await?;
        lists.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(Extraction {
            lists,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use banlist_core::CardDatabase;
    use banlist_store::SnapshotStore;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::http::FetchClient;
    use crate::pipeline;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn web_info_groups_map_to_levels() {
        let json = r#"{
            "name": "禁限卡表：2025/4",
            "list": [
                {"name": "禁止", "list": [{"name": "强欲之壶"}]},
                {"name": "限制", "list": [{"name": "元素英雄·新宇侠"}]},
                {"name": "准限制", "list": []},
                {"name": "解除", "list": [{"name": "天使的施舍"}]}
            ]
        }"#;
        let list = parse_web_info("1.json", json).unwrap();
        assert_eq!(list.date, ymd(2025, 4, 1));
        assert_eq!(
            list.body,
            crate::source::ListBody::Levels(vec![
                (Level::Forbidden, "强欲之壶".to_string()),
                (Level::Limited, "元素英雄·新宇侠".to_string()),
            ])
        );
    }

    #[test]
    fn bad_date_label_is_an_error() {
        let err = parse_web_info("1.json", r#"{"name": "2025/4", "list": []}"#).unwrap_err();
        assert!(matches!(err, SyncError::Core(_)));
    }

    #[tokio::test]
    async fn end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/webList"))
            .and(query_param("type", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "list": [{"name": "2025/4", "id": 12}, {"name": "2025/1", "id": 11}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/webinfo/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "禁限卡表：2025/4",
                "list": [{"list": [{"name": "元素英雄･新宇侠"}]}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/webinfo/11"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "禁限卡表：2025/1",
                "list": [{"list": []}, {"list": [{"name": "元素英雄·新宇侠"}]}]
            })))
            .mount(&server)
            .await;

        let tmp = tempfile::TempDir::new().unwrap();
        let store = SnapshotStore::open(tmp.path()).await.unwrap();
        let client = FetchClient::new(Duration::from_secs(5)).unwrap();
        let ctx = ExtractContext {
            client: &client,
            store: &store,
            today: ymd(2025, 2, 1),
        };
        let cards = CardDatabase::from_json(
            r#"[{"konami_id": 7777, "name": {"zh-CN": "元素英雄・新宇侠"}}]"#,
        )
        .unwrap();
        let source = SimplifiedChinese {
            base_url: server.uri(),
        };

        let report = pipeline::run(&source, &ctx, Some(&cards)).await.unwrap();
        assert_eq!(report.unresolved, 0);
        for file in ["webList.json", "11.json", "12.json", "2025-01-01.vector.json", "2025-04-01.vector.json"] {
            assert!(tmp.path().join(file).exists(), "{file}");
        }
        let pointers = report.pointers.unwrap();
        assert_eq!(pointers.current, Some(ymd(2025, 1, 1)));
        assert_eq!(pointers.upcoming, Some(ymd(2025, 4, 1)));
        let upcoming = store.read_snapshot("upcoming.vector.json").await.unwrap();
        assert_eq!(
            upcoming.regulation.get(&banlist_core::CardKey::Id(7777)),
            Some(0)
        );
    }
}
