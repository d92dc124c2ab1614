use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_USER_AGENT: &str = concat!("source-scrapers/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// Base directory every relative output path is resolved against.
    pub output_dir: PathBuf,
    pub http_timeout: Duration,
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(dir) = get("SCRAPE_OUTPUT_DIR").filter(|d| !d.trim().is_empty()) {
            cfg.output_dir = PathBuf::from(dir);
        }
        if let Some(timeout) = get("SCRAPE_HTTP_TIMEOUT_SECS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                cfg.http_timeout = Duration::from_secs(parsed);
            }
        }
        if let Some(ua) = get("SCRAPE_USER_AGENT").filter(|u| !u.is_empty()) {
            cfg.user_agent = ua;
        }
        cfg
    }

    pub fn out_path(&self, rel: &str) -> PathBuf {
        self.output_dir.join(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_without_env() {
        let cfg = ScrapeConfig::from_lookup(|_| None);
        assert_eq!(cfg, ScrapeConfig::default());
        assert_eq!(cfg.out_path("metadata/arxiv.json"), PathBuf::from("./metadata/arxiv.json"));
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SCRAPE_OUTPUT_DIR", "/tmp/out"),
            ("SCRAPE_HTTP_TIMEOUT_SECS", "5"),
            ("SCRAPE_USER_AGENT", "bot/1.0"),
        ]);
        let cfg = ScrapeConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(cfg.http_timeout, Duration::from_secs(5));
        assert_eq!(cfg.user_agent, "bot/1.0");
    }

    #[test]
    fn bad_timeout_keeps_default() {
        let cfg = ScrapeConfig::from_lookup(|k| (k == "SCRAPE_HTTP_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(cfg.http_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
