//! Schema — field names from the extraction pattern and the coercion rules
//! that are validated against them.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LogError, LogResult};

/// Target type for a field's captured text.
///
/// Unrecognized tags are kept as [`TypeTag::Unknown`] so construction can
/// accept them; they fail the first time a matching line is coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeTag {
    Integer,
    Float,
    Date,
    /// Explicit string passthrough; also the implicit default.
    Character,
    Unknown(String),
}

impl TypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::Date => "date",
            TypeTag::Character => "character",
            TypeTag::Unknown(tag) => tag,
        }
    }
}

impl From<&str> for TypeTag {
    fn from(tag: &str) -> Self {
        match tag {
            "integer" => TypeTag::Integer,
            "float" => TypeTag::Float,
            "date" => TypeTag::Date,
            "character" => TypeTag::Character,
            other => TypeTag::Unknown(other.to_string()),
        }
    }
}

impl From<String> for TypeTag {
    fn from(tag: String) -> Self {
        TypeTag::from(tag.as_str())
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name → type tag. Fields without an entry stay strings.
pub type CoercionRules = BTreeMap<String, TypeTag>;

/// The set of named captures of an extraction pattern, in pattern order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    /// Derive the schema from a compiled pattern. Fails if the pattern has
    /// no named groups.
    pub fn from_regex(regex: &Regex) -> LogResult<Self> {
        let fields: Vec<String> = regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();

        if fields.is_empty() {
            return Err(LogError::NoFields);
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Fail on the first name that is not a field of this schema.
    pub fn validate_fields<I, S>(&self, fields: I) -> LogResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for field in fields {
            let field = field.as_ref();
            if !self.contains(field) {
                return Err(LogError::UnknownField(field.to_string()));
            }
        }
        Ok(())
    }

    /// Rule keys must be schema fields. Rule values are not checked here.
    pub fn validate_rules(&self, rules: &CoercionRules) -> LogResult<()> {
        self.validate_fields(rules.keys())
    }
}
