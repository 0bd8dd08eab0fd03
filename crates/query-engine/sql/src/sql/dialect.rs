//! The SQL dialects we can render for.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::Error;

/// Controls identifier quoting and placeholder syntax.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Backtick identifiers, `?` placeholders.
    #[default]
    Sqlite,
    /// Backtick identifiers, `?` placeholders.
    Mysql,
    /// Double quoted identifiers, `$1`, `$2`, ... placeholders.
    Postgres,
}

impl Dialect {
    pub fn identifier_quote(self) -> char {
        match self {
            Dialect::Sqlite | Dialect::Mysql => '`',
            Dialect::Postgres => '"',
        }
    }

    /// Quote a single identifier part, doubling any embedded quote characters.
    pub fn quote_identifier(self, name: &str) -> String {
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// The placeholder for the parameter at (1-based) `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Sqlite | Dialect::Mysql => "?".to_string(),
            Dialect::Postgres => format!("${index}"),
        }
    }

    /// The LIMIT to emit when only an OFFSET was requested. Some databases do not accept
    /// OFFSET on its own.
    pub fn unbounded_limit(self) -> Option<u64> {
        match self {
            Dialect::Sqlite => Some(i64::MAX.unsigned_abs()),
            Dialect::Mysql => Some(u64::MAX),
            Dialect::Postgres => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Sqlite => write!(f, "sqlite"),
            Dialect::Mysql => write!(f, "mysql"),
            Dialect::Postgres => write!(f, "postgres"),
        }
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "mysql" => Ok(Dialect::Mysql),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            _ => Err(Error::UnknownDialect(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names() {
        assert_eq!("SQLite".parse::<Dialect>(), Ok(Dialect::Sqlite));
        assert_eq!("postgresql".parse::<Dialect>(), Ok(Dialect::Postgres));
        assert_eq!(
            "oracle".parse::<Dialect>(),
            Err(Error::UnknownDialect("oracle".to_string()))
        );
    }

    #[test]
    fn display_round_trips() {
        for dialect in [Dialect::Sqlite, Dialect::Mysql, Dialect::Postgres] {
            assert_eq!(dialect.to_string().parse::<Dialect>(), Ok(dialect));
        }
    }
}
