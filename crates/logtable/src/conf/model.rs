use serde::{Deserialize, Serialize};

use crate::filter::FilterMode;
use crate::schema::CoercionRules;

/// One query run by the `logtable` binary.
///
/// ```toml
/// pattern = '^(?P<date>\w{3} \d{2} \d{2}:\d{2}:\d{2}) (?P<fruit>\w+): (?P<value>-?\d+)$'
/// date_format = "%b %d %H:%M:%S"
/// output = "combined.log"
///
/// [field_types]
/// date = "date"
/// value = "integer"
///
/// [source]
/// path = "HomeWork"
/// file_pattern = "fruit.log"
///
/// [order]
/// fields = ["date", "fruit"]
///
/// [summarize]
/// value = "value"
/// by = "fruit"
/// groups = ["Kiwi"]
/// reducers = ["min", "max", "mean", "std"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub pattern: String,
    pub field_types: CoercionRules,
    pub date_format: Option<String>,
    pub source: SourceConfig,
    pub filter: Option<FilterConfig>,
    pub order: Option<OrderConfig>,
    pub summarize: Option<SummarizeConfig>,
    /// Where to write the (ordered) raw lines, if anywhere
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: String,
    pub file_pattern: String,
}

/// Raw-line prefilter applied before extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub pattern: String,
    #[serde(default = "default_filter_mode")]
    pub mode: FilterMode,
    #[serde(default)]
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    pub fields: Vec<String>,
    pub decreasing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeConfig {
    pub value: String,
    pub by: String,
    /// Empty: every group. One entry: exactly that group. More: any of them.
    pub groups: Vec<String>,
    pub reducers: Vec<String>,
    pub print: bool,
}

fn default_filter_mode() -> FilterMode {
    FilterMode::Include
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            field_types: CoercionRules::new(),
            date_format: None,
            source: SourceConfig::default(),
            filter: None,
            order: None,
            summarize: None,
            output: None,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: ".".to_string(),
            file_pattern: "*.log".to_string(),
        }
    }
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            value: String::new(),
            by: String::new(),
            groups: Vec::new(),
            reducers: vec!["count".to_string()],
            print: true,
        }
    }
}
