use crate::client::{AnalysisBackend, AnalysisError};
use crate::config::Settings;
use crate::domain::{AnalysisRequest, AnalysisResponse};
use anyhow::Context;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    http: reqwest::Client,
    base_url: String,
    analyze_url: String,
    timeout: Duration,
}

impl HttpAnalysisClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        settings.validate()?;

        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .context("failed to build analysis http client")?;

        Ok(Self {
            http,
            base_url: settings.base_url().to_string(),
            analyze_url: settings.analyze_url(),
            timeout: settings.request_timeout,
        })
    }
}

#[async_trait::async_trait]
impl AnalysisBackend for HttpAnalysisClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        let started = Instant::now();
        let res = self
            .http
            .post(&self.analyze_url)
            .json(req)
            .send()
            .await
            .map_err(|e| AnalysisError::from_reqwest(e, self.timeout))?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(
                symbol = %req.symbol,
                status = status.as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "analysis backend returned failure status"
            );
            return Err(AnalysisError::Http {
                status: status.as_u16(),
            });
        }

        let text = res
            .text()
            .await
            .map_err(|e| AnalysisError::from_reqwest(e, self.timeout))?;
        let parsed = serde_json::from_str::<AnalysisResponse>(&text)
            .map_err(|e| AnalysisError::Parse(e.to_string()))?;

        tracing::debug!(
            symbol = %req.symbol,
            years = parsed.years.len(),
            anomalies = parsed.anomalies.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis response decoded"
        );
        Ok(parsed)
    }
}
