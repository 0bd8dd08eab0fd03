//! Type definitions of a low-level SQL string representation.

use serde::Serialize;

use super::ast::{Fragment, Part};
use super::dialect::Dialect;

/// A rendered statement: SQL text and the parameters for its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SQL {
    pub sql: String,
    pub params: Vec<Param>,
}

impl Default for SQL {
    fn default() -> Self {
        Self::new()
    }
}

/// A parameter for a parameterized query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Param {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl SQL {
    pub fn new() -> SQL {
        SQL {
            sql: String::new(),
            params: vec![],
        }
    }

    /// Render a fragment, quoting identifiers and numbering placeholders for the given dialect.
    pub fn from_fragment(fragment: &Fragment, dialect: Dialect) -> SQL {
        let mut sql = SQL::new();
        for part in &fragment.parts {
            match part {
                Part::Syntax(text) => sql.append_syntax(text),
                Part::Identifier(name) => sql.append_identifier(name, dialect),
                Part::Alias(name) => sql.append_alias(name, dialect),
                Part::Param(param) => sql.append_param(param.clone(), dialect),
            }
        }
        sql
    }

    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Qualified names are quoted part by part. `*` is left as is, so `t.*` stays valid.
    pub fn append_identifier(&mut self, name: &str, dialect: Dialect) {
        for (index, part) in name.split('.').enumerate() {
            if index > 0 {
                self.sql.push('.');
            }
            if part == "*" {
                self.sql.push('*');
            } else {
                self.sql.push_str(&dialect.quote_identifier(part));
            }
        }
    }

    /// Aliases are a single name, so `.` and `*` are quoted with the rest.
    pub fn append_alias(&mut self, name: &str, dialect: Dialect) {
        self.sql.push_str(&dialect.quote_identifier(name));
    }

    pub fn append_param(&mut self, param: Param, dialect: Dialect) {
        self.params.push(param);
        self.sql.push_str(&dialect.placeholder(self.params.len()));
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Int(value)
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Float(value)
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::String(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::String(value)
    }
}
