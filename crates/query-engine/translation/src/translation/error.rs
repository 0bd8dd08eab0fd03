//! Errors for query translation.

use query_engine_sql::sql;

/// A type for translation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// The query description is malformed. Raised before any SQL is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("query does not contains valid action, got {0:?}.")]
    InvalidAction(Option<String>),
    #[error("table is required in the query.")]
    MissingTable,
    #[error("table is required in a join.")]
    MissingJoinTable,
    #[error("only 1 level deep query allowed")]
    NestingTooDeep,
    #[error("filter operator \"{0}\" is not supported.")]
    UnsupportedOperator(String),
    #[error("a comparison needs exactly one of \"value\" or \"rightColumn\".")]
    ComparisonOperand,
    #[error("\"{0}\" must not be an empty list.")]
    EmptyList(&'static str),
    #[error("order by direction \"{0}\" is not supported, expected \"asc\" or \"desc\".")]
    InvalidOrderDirection(String),
    #[error("join type \"{0}\" is not supported.")]
    InvalidJoinType(String),
    #[error("a {0} join requires an \"on\" filter.")]
    MissingJoinPredicate(String),
    #[error("a cross join does not take an \"on\" filter.")]
    UnexpectedJoinPredicate,
    #[error("\"{0}\" is not a valid function name.")]
    InvalidFunctionName(String),
    #[error("\"{0}\" is not a valid type to cast to.")]
    InvalidCastType(String),
    #[error("identifiers and aliases must not be empty, found one in {0}.")]
    InvalidIdentifier(String),
    #[error("{0} is not a supported literal value.")]
    UnsupportedValue(String),
}

/// The compilers were driven incorrectly. These do not depend on user input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("{0} must be defined when calling this function")]
    MissingClause(&'static str),
    #[error("{0} was compiled before it was prepared")]
    NotPrepared(&'static str),
    #[error("failed to render SQL: {0}")]
    Render(#[from] sql::Error),
}

impl From<sql::Error> for Error {
    fn from(value: sql::Error) -> Self {
        Error::Build(BuildError::Render(value))
    }
}
