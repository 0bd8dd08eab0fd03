//! Errors raised while composing SQL.

/// A type for SQL composition errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("raw SQL {text:?} has {placeholders} placeholder(s) but {bindings} binding(s) were supplied")]
    BindingCountMismatch {
        text: String,
        placeholders: usize,
        bindings: usize,
    },
    #[error("unknown SQL dialect {0:?}, expected one of sqlite, mysql, postgres")]
    UnknownDialect(String),
}
