use crate::api::{
    DashboardApi, EXECUTE_ACTION_PATH, LATEST_RECOMMENDATIONS_PATH, LATEST_SCAN_PATH,
    TRIGGER_SCAN_PATH,
};
use crate::config::Settings;
use crate::domain::recommendation::{ActionResult, Recommendation, RecommendationSummary};
use crate::domain::reply::Reply;
use crate::domain::scan::{ScanSnapshot, ScanTriggerResult};
use anyhow::Context;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDashboardApi {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.http_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .context("failed to build backend http client")?;

        Ok(Self::with_client(http, settings.backend_url()))
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // The backend reports "no data" with a JSON body on 404/500, so the status
    // code is logged but the body decides.
    async fn read_json(&self, req: reqwest::RequestBuilder, path: &str) -> anyhow::Result<Value> {
        let res = req
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read {path} response body"))?;
        if !status.is_success() {
            tracing::debug!(%status, path, "backend answered with non-success status");
        }

        serde_json::from_str::<Value>(&text)
            .with_context(|| format!("{path} response is not valid JSON (HTTP {status}): {text}"))
    }
}

#[async_trait::async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn latest_scan(&self) -> anyhow::Result<Reply<ScanSnapshot>> {
        let req = self.http.get(self.url(LATEST_SCAN_PATH));
        let raw = self.read_json(req, LATEST_SCAN_PATH).await?;
        Reply::from_value(raw)
    }

    async fn latest_recommendations(&self) -> anyhow::Result<Reply<RecommendationSummary>> {
        let req = self.http.get(self.url(LATEST_RECOMMENDATIONS_PATH));
        let raw = self.read_json(req, LATEST_RECOMMENDATIONS_PATH).await?;
        Reply::from_value(raw)
    }

    async fn trigger_scan(&self) -> anyhow::Result<ScanTriggerResult> {
        let req = self.http.post(self.url(TRIGGER_SCAN_PATH));
        let raw = self.read_json(req, TRIGGER_SCAN_PATH).await?;
        serde_json::from_value(raw).context("failed to parse trigger-scan response")
    }

    async fn execute_action(&self, recommendation: &Recommendation) -> anyhow::Result<ActionResult> {
        let req = self
            .http
            .post(self.url(EXECUTE_ACTION_PATH))
            .json(recommendation);
        let raw = self.read_json(req, EXECUTE_ACTION_PATH).await?;
        serde_json::from_value(raw).context("failed to parse execute-action response")
    }
}
