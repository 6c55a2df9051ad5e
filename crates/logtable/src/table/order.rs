use std::cmp::Ordering;

use tracing::debug;

use super::LogTable;
use crate::error::LogResult;
use crate::record::Record;

impl LogTable {
    /// Stable in-place sort by the given fields, first field as primary key.
    ///
    /// `decreasing` reverses the comparison of the whole key tuple. Records
    /// that tie on every key keep their relative order either way.
    pub fn order_by<S: AsRef<str>>(&mut self, fields: &[S], decreasing: bool) -> LogResult<()> {
        self.schema.validate_fields(fields)?;
        let keys: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();

        self.records.sort_by(|a, b| {
            let ord = compare_by(a, b, &keys);
            if decreasing {
                ord.reverse()
            } else {
                ord
            }
        });

        debug!(keys = ?keys, decreasing, records = self.records.len(), "ordered records");
        Ok(())
    }
}

fn compare_by(a: &Record, b: &Record, keys: &[&str]) -> Ordering {
    keys.iter()
        .map(|key| a.get(key).cmp(&b.get(key)))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}
