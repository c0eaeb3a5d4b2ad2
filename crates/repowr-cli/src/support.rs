use chrono::DateTime;
use repowr_address::CodecOptions;
use repowr_ledger::LedgerStore;
use repowr_protocol::ProtocolConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "repowr.toml";
pub const DEFAULT_STORE_PATH: &str = ".repowr/store.jsonl";
pub const DEFAULT_TOP_COUNT: usize = 10;
pub const DEFAULT_REVIEW_LIMIT: usize = 5;

/// Settings read from `repowr.toml`. Every field is optional in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub protocol: ProtocolConfig,
    pub address: CodecOptions,
    pub store_path: String,
    pub top_count: usize,
    pub review_limit: usize,
    pub transfers_limit: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            protocol: ProtocolConfig::default(),
            address: CodecOptions::default(),
            store_path: DEFAULT_STORE_PATH.to_string(),
            top_count: DEFAULT_TOP_COUNT,
            review_limit: DEFAULT_REVIEW_LIMIT,
            transfers_limit: None,
        }
    }
}

impl AppConfig {
    /// `--store` wins over the configured path.
    pub fn store_path(&self, flag: Option<String>) -> PathBuf {
        PathBuf::from(flag.unwrap_or_else(|| self.store_path.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Explicit paths must exist; the default path is optional.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let (path, required) = match path {
        Some(path) => (path, true),
        None => (DEFAULT_CONFIG_PATH, false),
    };
    if !required && !Path::new(path).exists() {
        tracing::debug!(path, "no config file, using defaults");
        return Ok(AppConfig::default());
    }
    tracing::debug!(path, "loading config");
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

pub fn load_config_or_exit(path: Option<&str>) -> AppConfig {
    load_config(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn load_store_or_exit(path: &Path, options: CodecOptions) -> LedgerStore {
    let store = LedgerStore::load_jsonl(path, options).unwrap_or_else(|e| {
        eprintln!("error: failed to load {}: {e}", path.display());
        std::process::exit(1);
    });
    let stats = store.stats();
    tracing::debug!(
        path = %path.display(),
        transactions = stats.transactions,
        ratings = stats.ratings,
        profiles = stats.profiles,
        "store loaded"
    );
    store
}

pub fn save_store_or_exit(store: &LedgerStore, path: &Path) {
    store.save_jsonl(path).unwrap_or_else(|e| {
        eprintln!("error: failed to save {}: {e}", path.display());
        std::process::exit(1);
    });
    tracing::debug!(path = %path.display(), "store saved");
}

pub fn print_json(payload: &impl Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(payload).expect("json serialization")
    );
}

/// `YYYY-MM-DD HH:MM` in UTC, or the raw number when out of range.
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// `0:83dfd5...0f31a8` style abbreviation for text output.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 18 {
        return address.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{head}...{tail}")
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
store_path = "data/store.jsonl"

[protocol]
max_comment_chars = 280

[address]
verify_checksum = true
"#,
        )
        .expect("config parses");
        assert_eq!(config.store_path, "data/store.jsonl");
        assert_eq!(config.protocol.max_comment_chars, 280);
        assert_eq!(config.protocol.max_rating, 5);
        assert!(config.address.verify_checksum);
        assert_eq!(config.top_count, DEFAULT_TOP_COUNT);
    }

    #[test]
    fn store_flag_overrides_config() {
        let config = AppConfig::default();
        assert_eq!(config.store_path(None), PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(
            config.store_path(Some("x.jsonl".into())),
            PathBuf::from("x.jsonl")
        );
    }

    #[test]
    fn timestamps_and_addresses_are_shortened_for_text() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13");
        assert_eq!(short_address("0:abc"), "0:abc");
        assert_eq!(
            short_address("0:83dfd552e63729b472fcbcc8c45ebcc6691702558b68ec7527e1ba403a0f31a8"),
            "0:83dfd552...0f31a8"
        );
    }
}
