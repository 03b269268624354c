//! Command implementations

pub mod query;
pub mod report;
pub mod schema;
pub mod shell;
