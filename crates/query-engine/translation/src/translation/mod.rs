//! Validate a query AST and compile it, clause by clause, into a single SQL statement.

pub mod error;
pub mod lifecycle;
pub mod query;
