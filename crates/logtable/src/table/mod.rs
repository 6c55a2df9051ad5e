//! Table — the log container.
//!
//! A [`LogTable`] is built once from an extraction pattern and coercion
//! rules, then fed lines from any number of sources and queried:
//!
//! - `parse.rs`: line matching and record construction
//! - `order.rs`: stable multi-key sorting
//! - `summary.rs`: grouped aggregation with named reducers
//! - `export.rs`: re-emitting raw lines
//!
//! Validation of field names happens eagerly; validation of rule *values*
//! happens the first time a matching line needs them.

pub mod parse;
pub mod order;
pub mod summary;
pub mod export;

use regex::Regex;
use tracing::debug;

use crate::coerce::Coercer;
use crate::error::{LogError, LogResult};
use crate::filter::LineFilter;
use crate::record::Record;
use crate::schema::{CoercionRules, Schema, TypeTag};
use crate::value::Value;

pub use parse::ParseStats;
pub use summary::{GroupFilter, Reducer, Summary};

#[derive(Debug)]
pub struct LogTable {
    /// Extraction pattern anchored to the whole line
    pattern: Regex,
    schema: Schema,
    rules: CoercionRules,
    coercer: Coercer,
    line_filter: Option<LineFilter>,
    records: Vec<Record>,
}

impl LogTable {
    /// Build a table from an extraction pattern, coercion rules and an
    /// optional strftime-style date format.
    ///
    /// Fails if the pattern has no named groups, if a rule names a field the
    /// pattern does not capture, or if a `date` rule is given without a
    /// date format.
    pub fn new(
        pattern: &str,
        rules: CoercionRules,
        date_format: Option<&str>,
    ) -> LogResult<Self> {
        let mut builder = Self::builder(pattern).rules(rules);
        if let Some(fmt) = date_format {
            builder = builder.date_format(fmt);
        }
        builder.build()
    }

    pub fn builder(pattern: impl Into<String>) -> LogTableBuilder {
        LogTableBuilder {
            pattern: pattern.into(),
            rules: CoercionRules::new(),
            date_format: None,
            line_filter: None,
        }
    }

    pub fn fields(&self) -> &[String] {
        self.schema.fields()
    }

    pub fn rules(&self) -> &CoercionRules {
        &self.rules
    }

    pub fn date_format(&self) -> Option<&str> {
        self.coercer.date_format()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Coerce `raw` the way a captured value of `field` would be.
    pub fn coerce(&self, field: &str, raw: &str) -> LogResult<Value> {
        self.schema.validate_fields([field])?;
        match self.rules.get(field) {
            Some(tag) => self.coercer.apply(field, tag, raw),
            None => Ok(Value::Str(raw.to_string())),
        }
    }
}

pub struct LogTableBuilder {
    pattern: String,
    rules: CoercionRules,
    date_format: Option<String>,
    line_filter: Option<LineFilter>,
}

impl LogTableBuilder {
    pub fn coerce(mut self, field: impl Into<String>, tag: impl Into<TypeTag>) -> Self {
        self.rules.insert(field.into(), tag.into());
        self
    }

    pub fn rules(mut self, rules: CoercionRules) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn date_format(mut self, fmt: impl Into<String>) -> Self {
        self.date_format = Some(fmt.into());
        self
    }

    pub fn line_filter(mut self, filter: LineFilter) -> Self {
        self.line_filter = Some(filter);
        self
    }

    pub fn build(self) -> LogResult<LogTable> {
        let source = Regex::new(&self.pattern)?;
        let schema = Schema::from_regex(&source)?;
        schema.validate_rules(&self.rules)?;

        if self.date_format.is_none() {
            if let Some((field, _)) = self.rules.iter().find(|(_, tag)| **tag == TypeTag::Date) {
                return Err(LogError::MissingDateFormat { field: field.clone() });
            }
        }

        let pattern = anchored(&self.pattern)?;

        debug!(
            fields = ?schema.fields(),
            rules = self.rules.len(),
            date_format = self.date_format.as_deref().unwrap_or("-"),
            filtered = self.line_filter.is_some(),
            "log table created"
        );

        Ok(LogTable {
            pattern,
            schema,
            rules: self.rules,
            coercer: Coercer::new(self.date_format),
            line_filter: self.line_filter,
            records: Vec::new(),
        })
    }
}

/// Anchor an already-valid pattern to the whole line.
///
/// Named groups keep their names inside the non-capturing wrapper. A pattern
/// ending in an `(?x)` comment would swallow the wrapper's closing tokens, so
/// that case gets a newline to end the comment first.
fn anchored(pattern: &str) -> LogResult<Regex> {
    match Regex::new(&format!(r"\A(?:{})\z", pattern)) {
        Ok(re) => Ok(re),
        Err(err) => Regex::new(&format!("\\A(?:{}\n)\\z", pattern)).map_err(|_| err.into()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;

    pub(crate) const FRUIT_FMT: &str =
        r"^(?P<date>.+)\,(?P<fruit>.+?)\,(?P<value>.+?)\,(?P<score>.+?)$";
    pub(crate) const DATE_FMT: &str = "%b %d %H:%M:%S";

    pub(crate) fn fruit_rules() -> CoercionRules {
        let mut rules = CoercionRules::new();
        rules.insert("date".into(), TypeTag::Date);
        rules.insert("value".into(), TypeTag::Integer);
        rules.insert("score".into(), TypeTag::Float);
        rules
    }

    pub(crate) fn fruit_table() -> LogTable {
        LogTable::new(FRUIT_FMT, fruit_rules(), Some(DATE_FMT)).expect("valid table")
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn test_fields_match_named_groups() {
        let table = fruit_table();
        assert_eq!(table.fields().len(), 4);
        let mut fields = table.fields().to_vec();
        fields.sort();
        assert_eq!(fields, vec!["date", "fruit", "score", "value"]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_no_named_groups_rejected() {
        let mut rules = CoercionRules::new();
        rules.insert("some_value".into(), TypeTag::Integer);
        let err = LogTable::new(r"^.*$", rules, None).unwrap_err();
        assert!(matches!(err, LogError::NoFields));
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_unknown_rule_key_rejected() {
        let mut rules = fruit_rules();
        rules.remove("value");
        rules.insert("val".into(), TypeTag::Integer);
        let err = LogTable::new(FRUIT_FMT, rules, Some(DATE_FMT)).unwrap_err();
        assert!(matches!(err, LogError::UnknownField(ref f) if f == "val"));
    }

    #[test]
    fn test_unknown_rule_value_accepted_at_construction() {
        let table = LogTable::builder(FRUIT_FMT).coerce("score", "score").build();
        assert!(table.is_ok());
    }

    #[test]
    fn test_date_rule_requires_format() {
        let err = LogTable::builder(FRUIT_FMT).coerce("date", "date").build().unwrap_err();
        assert!(matches!(err, LogError::MissingDateFormat { ref field } if field == "date"));
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_invalid_regex_is_pattern_error() {
        let err = LogTable::new(r"(?P<open>", CoercionRules::new(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Pattern);
    }

    #[test]
    fn test_verbose_pattern_with_trailing_comment() {
        let mut table = LogTable::builder("(?x) (?P<word>[a-z]+) # a word").build().unwrap();
        assert_eq!(table.fields(), ["word"]);

        let stats = table.parse_lines(["hello", "hello world"]).unwrap();
        assert_eq!(stats.records_added, 1);
        assert_eq!(table.records()[0]["word"], Value::from("hello"));
    }

    #[test]
    fn test_builder_matches_new() {
        let built = LogTable::builder(FRUIT_FMT)
            .coerce("date", TypeTag::Date)
            .coerce("value", "integer")
            .coerce("score", "float")
            .date_format(DATE_FMT)
            .build()
            .unwrap();
        assert_eq!(built.rules(), fruit_table().rules());
        assert_eq!(built.date_format(), Some(DATE_FMT));
    }

    #[test]
    fn test_coerce_uses_field_rule() {
        let table = fruit_table();
        assert_eq!(table.coerce("value", "42").unwrap(), Value::Int(42));
        assert_eq!(table.coerce("fruit", "42").unwrap(), Value::from("42"));
        assert!(table.coerce("val", "42").is_err());
    }
}
