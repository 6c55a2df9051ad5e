//! Runtime — binary bootstrap and query execution.

pub mod boot;
pub mod run;
