use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::LogTable;
use crate::error::LogResult;

impl LogTable {
    /// Write every record's raw line, newline-terminated, in table order.
    pub fn write_to<W: Write>(&self, mut sink: W) -> LogResult<()> {
        for record in &self.records {
            sink.write_all(record.raw().as_bytes())?;
            sink.write_all(b"\n")?;
        }
        sink.flush()?;
        Ok(())
    }

    /// Create (or truncate) `path` and write the table to it.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> LogResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        debug!(path = %path.display(), records = self.records.len(), "exported records");
        Ok(())
    }
}
