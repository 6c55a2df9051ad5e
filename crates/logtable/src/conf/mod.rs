//! Conf module — query file model and loading.

pub mod model;
pub mod load;

pub use model::{FilterConfig, OrderConfig, QueryConfig, SourceConfig, SummarizeConfig};
pub use load::ConfigError;
