use crate::error::{Result, WrapErr};
use es_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validate::{convert_to_sec, format_es_url};

const DEFAULT_SCROLL: &str = "5m";

/// User configuration, read from `config.toml`.
///
/// `host` and `scroll` are kept as raw TOML values and validated on use, so a
/// value of the wrong type (`scroll = 5`) is reported as such.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default = "default_config", deny_unknown_fields)]
pub struct Config {
    /// 默认集群地址
    pub host: Option<toml::Value>,
    /// scroll 上下文存活时间
    pub scroll: toml::Value,
    pub page_size: usize,
    pub max_hits: Option<usize>,
    /// 5xx 重试次数
    pub retries: u32,
    pub backoff_factor: f64,
    pub clear_scroll: bool,
}

fn default_config() -> Config {
    let client = ClientConfig::default();

    Config {
        host: None,
        scroll: toml::Value::String(DEFAULT_SCROLL.to_string()),
        page_size: es_client::models::DEFAULT_PAGE_SIZE,
        max_hits: None,
        retries: client.retries,
        backoff_factor: client.backoff_factor,
        clear_scroll: client.clear_scroll,
    }
}

impl Default for Config {
    fn default() -> Self {
        default_config()
    }
}

impl Config {
    pub fn load_str(user_config_str: &str) -> Result<Config> {
        let user_config: Config = toml::from_str(user_config_str)?;
        Ok(user_config)
    }

    pub fn load() -> Result<Config> {
        let config_path = config::config_file_path()?;

        match std::fs::read_to_string(&config_path) {
            Ok(user_config_str) => Self::load_str(&user_config_str)
                .wrap_err_with(|| format!("Invalid configuration in {}", config_path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Err(e) = Self::create_example_config(&config_path) {
                    tracing::debug!("could not write example config: {}", e);
                }
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The configured host, validated
    pub fn host(&self) -> Result<Option<String>> {
        let host = self
            .host
            .as_ref()
            .map(|h| format_es_url(h))
            .transpose()
            .wrap_err("Invalid `host` in configuration")?;
        Ok(host)
    }

    /// The configured scroll lifetime, validated
    pub fn scroll(&self) -> Result<String> {
        convert_to_sec(&self.scroll).wrap_err("Invalid `scroll` in configuration")?;
        // convert_to_sec only succeeds on strings
        Ok(self.scroll.as_str().unwrap_or(DEFAULT_SCROLL).to_string())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            retries: self.retries,
            backoff_factor: self.backoff_factor,
            clear_scroll: self.clear_scroll,
            ..ClientConfig::default()
        }
    }

    fn create_example_config(config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let example_config = r#"# uptasticsearch configuration
#
# Created on first run. Command line flags override these values.

# Default cluster address
# host = "http://localhost:9200"

# How long the cluster keeps a scroll context alive between pages
# scroll = "5m"

# Hits per page, and an optional cap on the total
# page-size = 10000
# max-hits = 1000

# Retries on 500/502/503/504 responses, with exponential backoff (seconds)
# retries = 5
# backoff-factor = 0.1

# Release scroll contexts as soon as a search finishes
# clear-scroll = false
"#;

        std::fs::write(config_path, example_config)?;
        eprintln!("Created configuration file: {}", config_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let cfg = Config::load_str("").expect("Failed to load config");
        assert!(cfg.host().unwrap().is_none());
        assert_eq!(cfg.scroll().unwrap(), "5m");
        assert_eq!(cfg.page_size, 10_000);
        assert_eq!(cfg.client_config(), ClientConfig::default());
    }

    #[test]
    fn test_load_config_values() {
        const USER_CONFIG: &str = r#"
        host = "es.cluster.com:9200/"
        scroll = "2m"
        max-hits = 100
        clear-scroll = true
        "#;

        let cfg = Config::load_str(USER_CONFIG).expect("Failed to load config");

        assert_eq!(cfg.host().unwrap().as_deref(), Some("http://es.cluster.com:9200"));
        assert_eq!(cfg.scroll().unwrap(), "2m");
        assert_eq!(cfg.max_hits, Some(100));
        assert!(cfg.client_config().clear_scroll);
        assert_eq!(cfg.retries, 5);
    }

    #[test]
    fn test_load_config_unknown_field() {
        const USER_CONFIG: &str = r#"
        hostname = "localhost:9200"
        "#;

        let err = Config::load_str(USER_CONFIG).unwrap_err();
        assert!(err.to_string().contains("unknown field `hostname`"));
    }

    #[test]
    fn test_non_string_scroll() {
        let cfg = Config::load_str("scroll = 5").expect("Failed to load config");
        let err = cfg.scroll().unwrap_err();
        let cause = err.root_cause().to_string();
        assert!(cause.contains("you provided integer"), "{}", cause);
    }

    #[test]
    fn test_non_string_host() {
        let cfg = Config::load_str("host = 9200").expect("Failed to load config");
        assert!(cfg.host().is_err());
    }

    #[test]
    fn test_malformed_scroll() {
        let cfg = Config::load_str(r#"scroll = "1y""#).expect("Failed to load config");
        assert!(cfg.scroll().is_err());
    }
}
