use chrono::NaiveDateTime;
use std::env;

/// Start of the "time together" counter when none is configured
pub const DEFAULT_TOGETHER_SINCE: &str = "2025-06-05T06:00:00";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub together_since: NaiveDateTime,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("MEMORY_TIMELINE_BASE_URL")
            .or_else(|| lookup("BASE_URL"))
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| "MEMORY_TIMELINE_BASE_URL must be set".to_string())?;

        let since_raw =
            lookup("MEMORY_TIMELINE_START").unwrap_or_else(|| DEFAULT_TOGETHER_SINCE.to_string());
        let together_since = parse_start(&since_raw)
            .ok_or_else(|| format!("MEMORY_TIMELINE_START is not a valid date-time: {}", since_raw))?;

        let http_timeout_secs = match lookup("MEMORY_TIMELINE_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("MEMORY_TIMELINE_HTTP_TIMEOUT_SECS must be a valid number: {}", raw))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            together_since,
            http_timeout_secs,
        })
    }
}

/// Accepts `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or a bare date (midnight).
fn parse_start(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
