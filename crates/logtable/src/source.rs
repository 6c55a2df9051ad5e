//! Source — feeding readers, files and directory trees into a table.
//!
//! The directory walk mirrors a top-down traversal: a directory's files are
//! visited (by name) before its subdirectories are descended into.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glob::Pattern;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::LogResult;
use crate::table::{LogTable, ParseStats};

impl LogTable {
    /// Parse every line from `reader`. Invalid UTF-8 is replaced, not fatal.
    pub fn parse_reader<R: BufRead>(&mut self, mut reader: R) -> LogResult<ParseStats> {
        let mut stats = ParseStats::default();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            self.ingest_line(&line, &mut stats)?;
        }
        Ok(stats)
    }

    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> LogResult<ParseStats> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let stats = self.parse_reader(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            seen = stats.lines_seen,
            added = stats.records_added,
            "parsed file"
        );
        Ok(stats)
    }

    /// Recursively parse every file under `root` whose file name matches the
    /// glob `file_pattern` (e.g. `"fruit.log"`, `"*.log"`).
    ///
    /// A missing root, or a tree without matching files, parses nothing.
    pub fn parse_dir(&mut self, root: impl AsRef<Path>, file_pattern: &str) -> LogResult<ParseStats> {
        let root = root.as_ref();
        let pattern = Pattern::new(file_pattern)?;
        let mut stats = ParseStats::default();

        if !root.exists() {
            debug!(root = %root.display(), "source root does not exist, nothing to parse");
            return Ok(stats);
        }

        let walker = WalkDir::new(root).sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        });

        let mut files = 0usize;
        for entry in walker {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            if !pattern.matches(&entry.file_name().to_string_lossy()) {
                continue;
            }
            stats += self.parse_file(entry.path())?;
            files += 1;
        }

        info!(
            "Parsed {} files matching {:?} under {} ({} records added)",
            files,
            file_pattern,
            root.display(),
            stats.records_added
        );
        Ok(stats)
    }
}
