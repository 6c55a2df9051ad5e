//! Boot — logging init, query load, table creation.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::QueryConfig;
use crate::filter::LineFilter;
use crate::table::LogTable;

/// Initialise the tracing / logging subsystem. Logs go to stderr so that
/// stdout only carries printed summaries.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logtable=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load the query and build the table it describes.
pub fn boot(config_path: Option<String>) -> Result<(LogTable, QueryConfig), Box<dyn std::error::Error>> {
    info!("Starting logtable v{}", env!("CARGO_PKG_VERSION"));

    let config = QueryConfig::load(config_path)?;
    info!(
        "Loaded query: source={} file_pattern={} rules={}",
        config.source.path,
        config.source.file_pattern,
        config.field_types.len()
    );

    let table = build_table(&config).map_err(|e| {
        error!("Failed to build log table: {}", e);
        e
    })?;
    info!("Log table ready with fields {:?}", table.fields());

    Ok((table, config))
}

pub fn build_table(config: &QueryConfig) -> Result<LogTable, crate::LogError> {
    let mut builder = LogTable::builder(config.pattern.clone()).rules(config.field_types.clone());
    if let Some(fmt) = &config.date_format {
        builder = builder.date_format(fmt.clone());
    }
    if let Some(filter) = &config.filter {
        builder = builder.line_filter(LineFilter::new(
            &filter.pattern,
            filter.case_sensitive,
            filter.mode,
        )?);
    }
    builder.build()
}
