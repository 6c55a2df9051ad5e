// Module structure for logtable.

// Core container
pub mod error;
pub mod schema;
pub mod value;
pub mod record;
pub mod coerce;
pub mod table;

// Collaborators
pub mod filter;
pub mod source;
pub mod stats;

// Binary support
pub mod conf;
pub mod runtime;

pub use error::{ErrorKind, LogError, LogResult};
pub use record::Record;
pub use schema::{CoercionRules, TypeTag};
pub use table::{GroupFilter, LogTable, LogTableBuilder, ParseStats, Reducer, Summary};
pub use value::Value;
