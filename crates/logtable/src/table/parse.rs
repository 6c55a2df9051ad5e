use std::collections::BTreeMap;
use std::ops::AddAssign;

use tracing::debug;

use super::LogTable;
use crate::error::LogResult;
use crate::record::Record;
use crate::value::Value;

/// Counters for one parse call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    pub lines_seen: usize,
    /// Rejected by the line filter before matching
    pub lines_filtered: usize,
    pub records_added: usize,
}

impl ParseStats {
    /// Lines that reached the pattern but did not match it.
    pub fn lines_unmatched(&self) -> usize {
        self.lines_seen - self.lines_filtered - self.records_added
    }
}

impl AddAssign for ParseStats {
    fn add_assign(&mut self, other: Self) {
        self.lines_seen += other.lines_seen;
        self.lines_filtered += other.lines_filtered;
        self.records_added += other.records_added;
    }
}

impl LogTable {
    /// Parse `lines` and append a record for every line that matches.
    ///
    /// Lines that do not match are skipped silently. A coercion failure
    /// aborts the call; records appended before it stay in the table.
    pub fn parse_lines<I, S>(&mut self, lines: I) -> LogResult<ParseStats>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = ParseStats::default();
        for line in lines {
            self.ingest_line(line.as_ref(), &mut stats)?;
        }

        debug!(
            seen = stats.lines_seen,
            filtered = stats.lines_filtered,
            added = stats.records_added,
            total = self.records.len(),
            "parsed lines"
        );
        Ok(stats)
    }

    /// Match one line without storing it. `Ok(None)` means no match.
    pub fn parse_line(&self, line: &str) -> LogResult<Option<Record>> {
        let line = line.trim();
        let Some(caps) = self.pattern.captures(line) else {
            return Ok(None);
        };

        let mut fields = BTreeMap::new();
        for field in self.schema.fields() {
            // Groups that did not take part in the match capture nothing
            let raw = caps.name(field).map_or("", |m| m.as_str());
            let value = match self.rules.get(field) {
                Some(tag) => self.coercer.apply(field, tag, raw)?,
                None => Value::Str(raw.to_string()),
            };
            fields.insert(field.clone(), value);
        }

        Ok(Some(Record::new(fields, line)))
    }

    pub(crate) fn ingest_line(&mut self, line: &str, stats: &mut ParseStats) -> LogResult<()> {
        stats.lines_seen += 1;
        let line = line.trim();

        if let Some(filter) = &self.line_filter {
            if !filter.should_keep(line) {
                stats.lines_filtered += 1;
                return Ok(());
            }
        }

        if let Some(record) = self.parse_line(line)? {
            self.records.push(record);
            stats.records_added += 1;
        }
        Ok(())
    }
}
