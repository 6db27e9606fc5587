pub mod api;
pub mod controller;
pub mod domain;
pub mod render;
pub mod status;
pub mod time;
pub mod view;

pub mod config {
    use anyhow::Context;
    use std::str::FromStr;
    use std::time::Duration;

    pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
    const DEFAULT_REFRESH_SECS: u64 = 60;
    const DEFAULT_STATUS_TIMEOUT_MS: u64 = 5000;
    const DEFAULT_PAGE_REFRESH_SECS: u64 = 5;
    const DEFAULT_PORT: u16 = 8080;

    /// Whether a loader surfaces its failures in the status display or only logs them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailureVisibility {
        Status,
        Log,
    }

    impl FromStr for FailureVisibility {
        type Err = anyhow::Error;

        fn from_str(s: &str) -> anyhow::Result<Self> {
            match s.trim().to_ascii_lowercase().as_str() {
                "status" => Ok(Self::Status),
                "log" => Ok(Self::Log),
                other => anyhow::bail!("unknown failure visibility {other:?} (expected status|log)"),
            }
        }
    }

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub backend_url: Option<String>,
        pub http_timeout_secs: Option<u64>,
        pub refresh_secs: u64,
        pub status_timeout_ms: u64,
        pub scan_failure_visibility: FailureVisibility,
        pub savings_failure_visibility: FailureVisibility,
        pub page_refresh_secs: u64,
        pub port: u16,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                backend_url: None,
                http_timeout_secs: None,
                refresh_secs: DEFAULT_REFRESH_SECS,
                status_timeout_ms: DEFAULT_STATUS_TIMEOUT_MS,
                scan_failure_visibility: FailureVisibility::Status,
                savings_failure_visibility: FailureVisibility::Log,
                page_refresh_secs: DEFAULT_PAGE_REFRESH_SECS,
                port: DEFAULT_PORT,
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let defaults = Self::default();
            Ok(Self {
                backend_url: std::env::var("COSTWATCH_BACKEND_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                http_timeout_secs: env_parse("COSTWATCH_HTTP_TIMEOUT_SECS")?,
                refresh_secs: env_parse("COSTWATCH_REFRESH_SECS")?
                    .unwrap_or(defaults.refresh_secs),
                status_timeout_ms: env_parse("COSTWATCH_STATUS_TIMEOUT_MS")?
                    .unwrap_or(defaults.status_timeout_ms),
                scan_failure_visibility: env_parse("COSTWATCH_SCAN_FAILURE_VISIBILITY")?
                    .unwrap_or(defaults.scan_failure_visibility),
                savings_failure_visibility: env_parse("COSTWATCH_SAVINGS_FAILURE_VISIBILITY")?
                    .unwrap_or(defaults.savings_failure_visibility),
                page_refresh_secs: env_parse("COSTWATCH_PAGE_REFRESH_SECS")?
                    .unwrap_or(defaults.page_refresh_secs),
                port: env_parse("PORT")?.unwrap_or(defaults.port),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn backend_url(&self) -> &str {
            self.backend_url.as_deref().unwrap_or(DEFAULT_BACKEND_URL)
        }

        pub fn refresh_interval(&self) -> Duration {
            Duration::from_secs(self.refresh_secs)
        }

        pub fn status_timeout(&self) -> Duration {
            Duration::from_millis(self.status_timeout_ms)
        }

        pub fn require_positive_refresh(&self) -> anyhow::Result<Duration> {
            anyhow::ensure!(self.refresh_secs > 0, "COSTWATCH_REFRESH_SECS must be > 0");
            Ok(self.refresh_interval())
        }
    }

    fn env_parse<T>(key: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Ok(raw) = std::env::var(key) else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        raw.trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: {raw:?}"))
    }

}
