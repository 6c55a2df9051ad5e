//! Run — execute one query: parse, order, summarize, export.

use std::io::Write;

use tracing::info;

use crate::conf::{QueryConfig, SummarizeConfig};
use crate::error::{LogError, LogResult};
use crate::stats::{self, StatReducer};
use crate::table::{GroupFilter, LogTable, Summary};
use crate::value::Value;

pub fn run(mut table: LogTable, config: &QueryConfig) -> Result<(), Box<dyn std::error::Error>> {
    execute(&mut table, config, std::io::stdout().lock())?;
    Ok(())
}

/// Run the query against `table`, printing summaries to `out`.
pub fn execute<W: Write>(
    table: &mut LogTable,
    config: &QueryConfig,
    out: W,
) -> LogResult<Option<Summary<Option<Value>>>> {
    let stats = table.parse_dir(&config.source.path, &config.source.file_pattern)?;
    info!(
        "Parsed {} lines: {} records, {} filtered, {} unmatched",
        stats.lines_seen,
        stats.records_added,
        stats.lines_filtered,
        stats.lines_unmatched()
    );

    if let Some(order) = &config.order {
        table.order_by(&order.fields, order.decreasing)?;
        info!("Ordered by {:?} (decreasing={})", order.fields, order.decreasing);
    }

    let summary = match &config.summarize {
        Some(summarize) => {
            let summary = summarize_query(table, summarize)?;
            if summarize.print {
                summary.print_to(out);
            }
            Some(summary)
        }
        None => None,
    };

    if let Some(output) = &config.output {
        table.write_to_path(output)?;
        info!("Wrote {} records to {}", table.len(), output);
    }

    Ok(summary)
}

fn summarize_query(
    table: &LogTable,
    config: &SummarizeConfig,
) -> LogResult<Summary<Option<Value>>> {
    let reducers: Vec<StatReducer> = config
        .reducers
        .iter()
        .map(|name| stats::by_name(name).ok_or_else(|| LogError::UnknownReducer(name.clone())))
        .collect::<LogResult<_>>()?;

    // Group names are written as text; coerce them like the `by` field
    let filter = match config.groups.as_slice() {
        [] => GroupFilter::All,
        [only] => GroupFilter::Exact(table.coerce(&config.by, only)?),
        many => GroupFilter::MemberOf(
            many.iter()
                .map(|group| table.coerce(&config.by, group))
                .collect::<LogResult<_>>()?,
        ),
    };

    table.summarize(&config.value, &config.by, &reducers, &filter)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::runtime::boot::build_table;
    use pretty_assertions::assert_eq;

    const LOG: &str = "\
Jan 02 03:04:05 INFO /var/app: Kiwi [0xab]: 12
Jan 02 03:04:01 INFO /var/app: Banana [0xcd]: 7
not a log line at all
Jan 01 10:00:00 WARN /var/app: Kiwi [0xef]: -4
Jan 03 00:00:00 INFO /var/app: Apple [0x01]: 30
";

    fn query(root: &std::path::Path, extra: &str) -> QueryConfig {
        let toml = format!(
            r#"
pattern = '^(?P<date>\w{{3}} \d{{2}} \d{{2}}\:\d{{2}}\:\d{{2}}) (?P<note>\w+) (?P<path>.+)\: (?P<fruit>\w+) \[(?P<hexcode>.+)\]\: (?P<value>-?\d+)$'
date_format = "%b %d %H:%M:%S"

[field_types]
date = "date"
value = "integer"

[source]
path = {root:?}
file_pattern = "fruit.log"
{extra}
"#,
            root = root.display().to_string(),
            extra = extra,
        );
        QueryConfig::from_toml(&toml).unwrap()
    }

    #[test]
    fn test_full_query() {
        let dir = tempfile::tempdir().unwrap();
        let host = dir.path().join("host1");
        fs::create_dir_all(&host).unwrap();
        fs::write(host.join("fruit.log"), LOG).unwrap();
        let output = dir.path().join("combined.log");

        let extra = format!(
            r#"
output = {output:?}

[order]
fields = ["date", "fruit"]

[summarize]
value = "value"
by = "fruit"
groups = ["Kiwi"]
reducers = ["min", "max", "mean", "count"]
"#,
            output = output.display().to_string()
        );
        let config = query(dir.path(), &extra);
        let mut table = build_table(&config).unwrap();

        let mut printed = Vec::new();
        let summary = execute(&mut table, &config, &mut printed).unwrap().unwrap();

        let kiwi = summary.get(&Value::from("Kiwi")).unwrap();
        assert_eq!(kiwi["min"], Some(Value::Int(-4)));
        assert_eq!(kiwi["max"], Some(Value::Int(12)));
        assert_eq!(kiwi["mean"], Some(Value::Float(4.0)));
        assert_eq!(kiwi["count"], Some(Value::Int(2)));
        assert_eq!(summary.len(), 1);

        let printed: serde_json::Value = serde_json::from_slice(&printed).unwrap();
        assert_eq!(printed["Kiwi"]["max"], serde_json::json!(12));

        let written = fs::read_to_string(&output).unwrap();
        let fruits: Vec<&str> = written
            .lines()
            .map(|l| l.split(": ").nth(1).unwrap().split(' ').next().unwrap())
            .collect();
        assert_eq!(fruits, vec!["Kiwi", "Banana", "Kiwi", "Apple"]);
    }

    #[test]
    fn test_group_filter_is_coerced() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fruit.log"), LOG).unwrap();

        let config = query(
            dir.path(),
            "[summarize]\nvalue = \"fruit\"\nby = \"value\"\ngroups = [\"12\", \"30\"]\nreducers = [\"count\"]\nprint = false\n",
        );
        let mut table = build_table(&config).unwrap();

        let mut printed = Vec::new();
        let summary = execute(&mut table, &config, &mut printed).unwrap().unwrap();
        let keys: Vec<Value> = summary.keys().cloned().collect();
        assert_eq!(keys, vec![Value::Int(12), Value::Int(30)]);
        assert!(printed.is_empty());
    }

    #[test]
    fn test_unknown_reducer_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fruit.log"), LOG).unwrap();

        // Built directly, so `validate()` never saw it
        let config = query(
            dir.path(),
            "[summarize]\nvalue = \"value\"\nby = \"fruit\"\nreducers = [\"count\", \"median\"]\n",
        );
        let mut table = build_table(&config).unwrap();

        let err = execute(&mut table, &config, Vec::new()).unwrap_err();
        assert!(matches!(err, LogError::UnknownReducer(ref name) if name == "median"));
    }

    #[test]
    fn test_query_with_unknown_order_field_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fruit.log"), LOG).unwrap();

        let config = query(dir.path(), "[order]\nfields = [\"val\"]\n");
        let mut table = build_table(&config).unwrap();
        assert!(execute(&mut table, &config, Vec::new()).is_err());
    }
}
