//! Load — query loading from file and environment variables.

use std::fs::File;
use std::io::Read;

use thiserror::Error;

use super::model::QueryConfig;
use crate::stats;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read query file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse query file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid query: {0}")]
    Invalid(String),
}

impl QueryConfig {
    /// Load the query file and apply environment overrides.
    /// Priority: Environment Variables > Query File > Defaults
    ///
    /// The file is `path` if given, else `LOGTABLE_CONFIG`, else
    /// `logtable.toml` in the working directory.
    pub fn load(path: Option<String>) -> Result<Self, ConfigError> {
        let config_path = path
            .or_else(|| std::env::var("LOGTABLE_CONFIG").ok())
            .unwrap_or_else(|| "logtable.toml".to_string());

        tracing::info!("Loading query from: {}", config_path);
        let mut config = Self::from_file(&config_path)?;
        config.apply_env();
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let io_err = |source| ConfigError::Io { path: path.to_string(), source };
        let mut file = File::open(path).map_err(io_err)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(io_err)?;

        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Environment variables override file settings for the source and output.
    pub fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("LOGTABLE_PATH") {
            self.source.path = path;
        }
        if let Ok(pattern) = std::env::var("LOGTABLE_FILE_PATTERN") {
            self.source.file_pattern = pattern;
        }
        if let Ok(output) = std::env::var("LOGTABLE_OUTPUT") {
            self.output = Some(output);
        }
    }

    /// Check values that the table itself does not validate. Field names are
    /// checked when the table is built and queried.
    pub fn validate(&self) -> Result<(), String> {
        if self.pattern.is_empty() {
            return Err("pattern must not be empty".to_string());
        }
        if self.source.path.is_empty() {
            return Err("source.path must not be empty".to_string());
        }
        if self.source.file_pattern.is_empty() {
            return Err("source.file_pattern must not be empty".to_string());
        }
        if let Some(filter) = &self.filter {
            if filter.pattern.is_empty() {
                return Err("filter.pattern must not be empty".to_string());
            }
        }
        if let Some(summarize) = &self.summarize {
            if summarize.value.is_empty() || summarize.by.is_empty() {
                return Err("summarize.value and summarize.by are required".to_string());
            }
            if summarize.reducers.is_empty() {
                return Err("summarize.reducers must not be empty".to_string());
            }
            if let Some(unknown) = summarize
                .reducers
                .iter()
                .find(|name| stats::by_name(name).is_none())
            {
                return Err(format!(
                    "unknown reducer {:?} (expected one of {:?})",
                    unknown,
                    stats::REDUCER_NAMES
                ));
            }
        }
        if matches!(&self.output, Some(output) if output.is_empty()) {
            return Err("output must not be empty when set".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterMode;
    use crate::schema::TypeTag;

    const QUERY: &str = r#"
pattern = '^(?P<date>.+)\,(?P<fruit>.+?)\,(?P<value>.+?)\,(?P<score>.+?)$'
date_format = "%b %d %H:%M:%S"

[field_types]
date = "date"
value = "integer"
score = "float"

[source]
path = "tests"
file_pattern = "test_log_file.csv"

[order]
fields = ["value", "score"]

[summarize]
value = "score"
by = "fruit"
groups = ["Kiwi"]
reducers = ["std"]
"#;

    #[test]
    fn test_parse_full_query() {
        let config = QueryConfig::from_toml(QUERY).unwrap();
        assert_eq!(config.field_types["value"], TypeTag::Integer);
        assert_eq!(config.date_format.as_deref(), Some("%b %d %H:%M:%S"));
        assert_eq!(config.source.file_pattern, "test_log_file.csv");

        let order = config.order.as_ref().unwrap();
        assert_eq!(order.fields, vec!["value", "score"]);
        assert!(!order.decreasing);

        let summarize = config.summarize.as_ref().unwrap();
        assert!(summarize.print);
        assert_eq!(summarize.groups, vec!["Kiwi"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = QueryConfig::from_toml("pattern = '(?P<line>.*)'").unwrap();
        assert_eq!(config.source.path, ".");
        assert_eq!(config.source.file_pattern, "*.log");
        assert!(config.order.is_none());
        assert!(config.summarize.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_filter_mode_defaults_to_include() {
        let config = QueryConfig::from_toml(
            "pattern = '(?P<line>.*)'\n[filter]\npattern = 'health'\n",
        )
        .unwrap();
        let filter = config.filter.unwrap();
        assert_eq!(filter.mode, FilterMode::Include);
        assert!(!filter.case_sensitive);

        let config = QueryConfig::from_toml(
            "pattern = '(?P<line>.*)'\n[filter]\npattern = 'health'\nmode = 'exclude'\n",
        )
        .unwrap();
        assert_eq!(config.filter.unwrap().mode, FilterMode::Exclude);
    }

    // ── Validation ──────────────────────────────────────────────

    #[test]
    fn test_validate_empty_pattern() {
        let config = QueryConfig::default();
        let result = config.validate();
        assert!(result.unwrap_err().contains("pattern"));
    }

    #[test]
    fn test_validate_unknown_reducer() {
        let mut config = QueryConfig::from_toml(QUERY).unwrap();
        config.summarize.as_mut().unwrap().reducers = vec!["median".to_string()];
        assert!(config.validate().unwrap_err().contains("median"));
    }

    #[test]
    fn test_validate_summarize_requires_fields() {
        let mut config = QueryConfig::from_toml(QUERY).unwrap();
        config.summarize.as_mut().unwrap().by = String::new();
        assert!(config.validate().unwrap_err().contains("summarize"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = QueryConfig::from_toml("pattern = ").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = QueryConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
