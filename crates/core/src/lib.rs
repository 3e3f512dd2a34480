pub mod client;
pub mod controller;
pub mod domain;
pub mod render;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
    const DEFAULT_TIMEOUT_SECS: u64 = 120;
    const ANALYZE_PATH: &str = "/api/analyze";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_base_url: String,
        pub request_timeout: Duration,
        pub sentry_dsn: Option<String>,
        pub port: Option<u16>,
    }

    impl Settings {
        /// Settings pointing at `api_base_url` with every other value defaulted.
        pub fn new(api_base_url: impl Into<String>) -> Self {
            Self {
                api_base_url: api_base_url.into(),
                request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                sentry_dsn: None,
                port: None,
            }
        }

        pub fn from_env() -> anyhow::Result<Self> {
            let settings = Self::from_env_unvalidated();
            settings.validate()?;
            Ok(settings)
        }

        /// Reads the environment without checking it, for callers that apply their own
        /// overrides before calling [`Settings::validate`].
        pub fn from_env_unvalidated() -> Self {
            let api_base_url = std::env::var("ANALYSIS_API_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

            let timeout_secs = std::env::var("ANALYSIS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS);

            Self {
                api_base_url,
                request_timeout: Duration::from_secs(timeout_secs),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                port: std::env::var("PORT").ok().and_then(|v| v.parse().ok()),
            }
        }

        pub fn with_timeout(mut self, timeout: Duration) -> Self {
            self.request_timeout = timeout;
            self
        }

        pub fn validate(&self) -> anyhow::Result<()> {
            let url = reqwest::Url::parse(&self.api_base_url)
                .with_context(|| format!("ANALYSIS_API_BASE_URL is not a valid URL: {}", self.api_base_url))?;
            anyhow::ensure!(
                matches!(url.scheme(), "http" | "https"),
                "ANALYSIS_API_BASE_URL must use http or https (got {})",
                url.scheme()
            );
            anyhow::ensure!(
                !self.request_timeout.is_zero(),
                "ANALYSIS_TIMEOUT_SECS must be greater than zero"
            );
            Ok(())
        }

        /// Base address as shown to users, without a trailing slash.
        pub fn base_url(&self) -> &str {
            self.api_base_url.trim_end_matches('/')
        }

        pub fn analyze_url(&self) -> String {
            format!("{}{}", self.base_url(), ANALYZE_PATH)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn analyze_url_strips_trailing_slash() {
            let settings = Settings::new("http://localhost:8000/");
            assert_eq!(settings.analyze_url(), "http://localhost:8000/api/analyze");
            assert_eq!(settings.base_url(), "http://localhost:8000");
        }

        #[test]
        fn validate_rejects_non_http_schemes() {
            assert!(Settings::new("ftp://example.com").validate().is_err());
            assert!(Settings::new("not a url").validate().is_err());
            assert!(Settings::new("https://analysis.example.com").validate().is_ok());
        }

        #[test]
        fn validate_rejects_zero_timeout() {
            let settings = Settings::new("http://localhost:8000").with_timeout(Duration::ZERO);
            assert!(settings.validate().is_err());
        }
    }
}
