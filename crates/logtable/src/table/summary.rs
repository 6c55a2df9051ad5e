//! Summary — grouped aggregation over a table.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Write;

use serde::Serialize;
use tracing::{debug, warn};

use super::LogTable;
use crate::error::LogResult;
use crate::value::Value;

/// A named function reducing one group's values to a single result.
///
/// The name keys the result in a [`Summary`]; two reducers with the same
/// name overwrite each other and the later one wins.
pub struct Reducer<R> {
    name: String,
    func: Box<dyn Fn(&[Value]) -> R>,
}

impl<R> Reducer<R> {
    pub fn new(name: impl Into<String>, func: impl Fn(&[Value]) -> R + 'static) -> Self {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, values: &[Value]) -> R {
        (self.func)(values)
    }
}

impl<R> fmt::Debug for Reducer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Which groups survive into a summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupFilter {
    #[default]
    All,
    Exact(Value),
    MemberOf(BTreeSet<Value>),
}

impl GroupFilter {
    pub fn exact(key: impl Into<Value>) -> Self {
        GroupFilter::Exact(key.into())
    }

    pub fn member_of<I, V>(keys: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        GroupFilter::MemberOf(keys.into_iter().map(Into::into).collect())
    }

    pub fn admits(&self, key: &Value) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Exact(wanted) => wanted == key,
            GroupFilter::MemberOf(wanted) => wanted.contains(key),
        }
    }
}

/// Group key → (reducer name → result).
#[derive(Debug, Clone, PartialEq)]
pub struct Summary<R> {
    groups: BTreeMap<Value, BTreeMap<String, R>>,
}

impl<R> Summary<R> {
    pub fn get(&self, key: &Value) -> Option<&BTreeMap<String, R>> {
        self.groups.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.groups.keys()
    }

    pub fn groups(&self) -> &BTreeMap<Value, BTreeMap<String, R>> {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<R: Serialize> Summary<R> {
    /// Pretty JSON with group keys rendered as text.
    pub fn render(&self) -> serde_json::Result<String> {
        let view: BTreeMap<String, &BTreeMap<String, R>> = self
            .groups
            .iter()
            .map(|(key, results)| (key.to_string(), results))
            .collect();
        serde_json::to_string_pretty(&view)
    }

    /// Write the rendered summary to `out`. Failures are logged, never
    /// returned: printing is a side channel.
    pub fn print_to<W: Write>(&self, mut out: W) {
        let rendered = match self.render() {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!("Failed to render summary: {}", e);
                return;
            }
        };
        if let Err(e) = writeln!(out, "{}", rendered) {
            warn!("Failed to print summary: {}", e);
        }
    }

    pub fn print(&self) {
        self.print_to(std::io::stdout().lock());
    }
}

impl LogTable {
    /// Summarize `value_field` grouped by `by_field`.
    ///
    /// Each surviving group's values are passed to every reducer in current
    /// table order. Groups rejected by `filter` are left out entirely.
    pub fn summarize<R>(
        &self,
        value_field: &str,
        by_field: &str,
        reducers: &[Reducer<R>],
        filter: &GroupFilter,
    ) -> LogResult<Summary<R>> {
        self.schema.validate_fields([value_field, by_field])?;

        let mut grouped: BTreeMap<&Value, Vec<Value>> = BTreeMap::new();
        for record in &self.records {
            let (Some(key), Some(value)) = (record.get(by_field), record.get(value_field)) else {
                continue;
            };
            if filter.admits(key) {
                grouped.entry(key).or_default().push(value.clone());
            }
        }

        let groups: BTreeMap<Value, BTreeMap<String, R>> = grouped
            .into_iter()
            .map(|(key, values)| {
                let mut results = BTreeMap::new();
                for reducer in reducers {
                    results.insert(reducer.name().to_string(), reducer.apply(&values));
                }
                (key.clone(), results)
            })
            .collect();

        debug!(
            value = value_field,
            by = by_field,
            reducers = reducers.len(),
            groups = groups.len(),
            "summarized records"
        );
        Ok(Summary { groups })
    }
}
