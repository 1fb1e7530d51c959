use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Errors surfaced by metrics backend queries.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid datasource URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("datasource returned status {0}")]
    BadStatus(u16),

    #[error("datasource query failed with status: {0}")]
    QueryFailed(String),
}

/// Query seam between the engine and a metrics backend.
///
/// Pipeline steps and option resolution depend on this trait rather than
/// a concrete HTTP client, so tests substitute a fake backend.
#[async_trait::async_trait]
pub trait MetricsQuerier: Send + Sync {
    /// Number of series an instant query returns against `base_url`.
    async fn series_count(&self, base_url: &str, query: &str) -> Result<usize, MetricsError>;

    /// Values of `label` across series matching `match_expr`.
    async fn label_values(
        &self,
        base_url: &str,
        label: &str,
        match_expr: &str,
    ) -> Result<Vec<String>, MetricsError>;
}

/// Instant query envelope (`/api/v1/query`).
#[derive(Debug, Deserialize)]
struct InstantQueryResponse {
    status: String,
    #[serde(default)]
    data: InstantQueryData,
}

#[derive(Debug, Default, Deserialize)]
struct InstantQueryData {
    #[serde(default)]
    result: Vec<serde_json::Value>,
}

/// Label values envelope (`/api/v1/label/<label>/values`).
#[derive(Debug, Deserialize)]
struct LabelValuesResponse {
    status: String,
    #[serde(default)]
    data: Vec<String>,
}

/// Reqwest-backed client for Prometheus-compatible backends.
pub struct PromClient {
    client: reqwest::Client,
}

impl PromClient {
    /// Build a client with a per-call timeout. Calls are not retried.
    pub fn new(timeout: Duration) -> Result<Self, MetricsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl MetricsQuerier for PromClient {
    async fn series_count(&self, base_url: &str, query: &str) -> Result<usize, MetricsError> {
        let mut url = Url::parse(base_url)?;
        url.set_path("/api/v1/query");
        url.query_pairs_mut().clear().append_pair("query", query);

        debug!(%url, "instant query");
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(MetricsError::BadStatus(resp.status().as_u16()));
        }

        let body: InstantQueryResponse = resp.json().await?;
        if body.status != "success" {
            return Err(MetricsError::QueryFailed(body.status));
        }
        Ok(body.data.result.len())
    }

    async fn label_values(
        &self,
        base_url: &str,
        label: &str,
        match_expr: &str,
    ) -> Result<Vec<String>, MetricsError> {
        let mut url = Url::parse(base_url)?;
        url.set_path(&format!("/api/v1/label/{label}/values"));
        url.query_pairs_mut()
            .clear()
            .append_pair("match[]", match_expr);

        debug!(%url, "label values query");
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(MetricsError::BadStatus(resp.status().as_u16()));
        }

        let body: LabelValuesResponse = resp.json().await?;
        if body.status != "success" {
            return Err(MetricsError::QueryFailed(body.status));
        }
        Ok(body.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_query_envelope_decodes() {
        let raw = r#"{"status":"success","data":{"resultType":"vector","result":[{"metric":{},"value":[0,"1"]}]}}"#;
        let parsed: InstantQueryResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, "success");
        assert_eq!(parsed.data.result.len(), 1);
    }

    #[test]
    fn label_values_envelope_decodes() {
        let raw = r#"{"status":"success","data":["backend","frontend"]}"#;
        let parsed: LabelValuesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.data, vec!["backend", "frontend"]);
    }

    #[test]
    fn error_envelope_without_data() {
        let raw = r#"{"status":"error"}"#;
        let parsed: InstantQueryResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, "error");
        assert!(parsed.data.result.is_empty());
    }
}
