//! HTTP client shared by the source adapters.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{info, warn};

use crate::SyncError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const USER_AGENT: &str = concat!("banlist/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over `reqwest::Client` with a bounded timeout.
///
/// Every request is logged before it is sent. Non-2xx responses become
/// [`SyncError::Server`]; nothing is retried.
#[derive(Clone)]
pub struct FetchClient {
    client: reqwest::Client,
}

impl FetchClient {
    pub fn new(timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// GET and return the raw body.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, SyncError> {
        let resp = self.send(self.client.get(url), url).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    /// GET and decode the body as text (lossy UTF-8 when the server does not say otherwise).
    pub async fn get_text(&self, url: &str) -> Result<String, SyncError> {
        let resp = self.send(self.client.get(url), url).await?;
        Ok(resp.text().await?)
    }

    /// GET a JSON endpoint and return the body text, warning when the
    /// content type is not `application/json`.
    pub async fn get_json_text(&self, url: &str) -> Result<String, SyncError> {
        let resp = self.send(self.client.get(url), url).await?;
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.starts_with("application/json") {
            warn!(url, content_type = %content_type, "unexpected content type");
        }
        Ok(resp.text().await?)
    }

    /// POST an `application/x-www-form-urlencoded` body and return the response text.
    pub async fn post_form(&self, url: &str, body: &str) -> Result<String, SyncError> {
        let req = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.to_string());
        let resp = self.send(req, url).await?;
        Ok(resp.text().await?)
    }

    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, SyncError> {
        info!(url, "fetching");
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> FetchClient {
        FetchClient::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn get_text_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let body = client()
            .get_text(&format!("{}/list", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let err = client()
            .get_bytes(&format!("{}/x.csv", server.uri()))
            .await
            .unwrap_err();
        match err {
            SyncError::Server { status, body, .. } => {
                assert_eq!(status, 503);
                assert_eq!(body, "down");
            }
            other => panic!("expected server error, got {other:?}"),
        }
        assert_eq!(
            SyncError::Server {
                url: String::new(),
                status: 503,
                body: String::new()
            }
            .exit_code(),
            1
        );
    }

    #[tokio::test]
    async fn post_form_sends_urlencoded_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/points"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("a=1&b=2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let body = client()
            .post_form(&format!("{}/points", server.uri()), "a=1&b=2")
            .await
            .unwrap();
        assert_eq!(body, "{}");
    }

    #[tokio::test]
    async fn timeout_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let slow = FetchClient::new(Duration::from_millis(50)).unwrap();
        let err = slow.get_text(&server.uri()).await.unwrap_err();
        assert!(matches!(err, SyncError::Http(_)));
    }
}
