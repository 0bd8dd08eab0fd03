//! Translate a declarative query description into parameterized SQL.

pub mod translation;
