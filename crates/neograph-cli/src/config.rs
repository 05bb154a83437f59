//! Settings file handling.
//!
//! Settings come from an optional TOML file with `[graph]` and `[ingest]`
//! tables. Connection values given on the command line or through the
//! environment override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use neograph_core::{IngestOptions, RetryPolicy};
use neograph_graph::GraphConfig;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "neograph.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub graph: GraphConfig,
    pub ingest: IngestConfig,
}

/// Ingestion tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub workers: usize,
    pub max_reported_errors: usize,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            max_reported_errors: 20,
            max_retries: 3,
            retry_base_delay_ms: 200,
            retry_max_delay_ms: 5000,
        }
    }
}

impl IngestConfig {
    pub fn to_options(&self) -> IngestOptions {
        IngestOptions {
            workers: self.workers.max(1),
            max_reported_errors: self.max_reported_errors,
            retry: RetryPolicy {
                max_retries: self.max_retries,
                base_delay: Duration::from_millis(self.retry_base_delay_ms),
                max_delay: Duration::from_millis(self.retry_max_delay_ms),
            },
        }
    }
}

/// Connection values from flags or environment variables.
#[derive(Debug, Clone, Default)]
pub struct GraphOverrides {
    pub uri: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl Settings {
    /// Load settings from `path`, or from `neograph.toml` if it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply(&mut self, overrides: GraphOverrides) {
        if let Some(uri) = overrides.uri {
            self.graph.uri = uri;
        }
        if let Some(user) = overrides.user {
            self.graph.user = user;
        }
        if let Some(password) = overrides.password {
            self.graph.password = password;
        }
        if let Some(database) = overrides.database {
            self.graph.database = database;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_partial_file() {
        let settings = Settings::parse(
            r#"
            [graph]
            uri = "bolt://db:7687"

            [ingest]
            workers = 4
            max_retries = 5
            "#,
        )
        .unwrap();
        assert_eq!(settings.graph.uri, "bolt://db:7687");
        assert_eq!(settings.graph.user, "neo4j");
        assert_eq!(settings.ingest.workers, 4);
        assert_eq!(settings.ingest.max_reported_errors, 20);

        let options = settings.ingest.to_options();
        assert_eq!(options.retry.max_retries, 5);
        assert_eq!(options.retry.base_delay, Duration::from_millis(200));
    }

    #[test]
    fn test_overrides_win() {
        let mut settings = Settings::default();
        settings.apply(GraphOverrides {
            uri: Some("bolt://other:7687".to_string()),
            password: Some("secret".to_string()),
            ..GraphOverrides::default()
        });
        assert_eq!(settings.graph.uri, "bolt://other:7687");
        assert_eq!(settings.graph.password, "secret");
        assert_eq!(settings.graph.database, "neo4j");
    }

    #[test]
    fn test_zero_workers_is_sequential() {
        let config = IngestConfig { workers: 0, ..IngestConfig::default() };
        assert_eq!(config.to_options().workers, 1);
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ingest]\nmax_reported_errors = 3").unwrap();
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.ingest.max_reported_errors, 3);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/neograph.toml"))).is_err());
    }
}
