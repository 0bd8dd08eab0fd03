//! Translate joins against tables and derived tables.

use query_engine_models::models;
use query_engine_sql::sql;

use super::filtering::FilterCompiler;
use super::helpers::{check_alias, check_identifier};
use super::root::QueryCompiler;
use crate::translation::error::{Error, ValidationError};
use crate::translation::lifecycle::{Compile, Lifecycle};

/// Compiles a single `KIND JOIN table [AS alias] [ON predicate]`.
#[derive(Debug)]
pub struct JoinCompiler {
    kind: sql::ast::JoinKind,
    table: JoinTable,
    alias: Option<String>,
    on: Option<FilterCompiler>,
    lifecycle: Lifecycle,
}

#[derive(Debug)]
enum JoinTable {
    Name(String),
    Query(Box<QueryCompiler>),
}

impl JoinCompiler {
    /// `nested` is set when the join belongs to a query that is itself a derived table, in which
    /// case the joined table cannot be another query.
    pub fn new(join: &models::Join, nested: bool) -> Result<JoinCompiler, Error> {
        let kind = translate_join_kind(&join.kind)?;

        let (table, alias) = match &join.table {
            None => return Err(ValidationError::MissingJoinTable.into()),
            Some(models::Table::Name(name)) => {
                check_identifier(name, "join table")?;
                (JoinTable::Name(name.clone()), join.alias.clone())
            }
            Some(models::Table::Query(_)) if nested => {
                return Err(ValidationError::NestingTooDeep.into())
            }
            Some(models::Table::Query(query)) => (
                JoinTable::Query(Box::new(QueryCompiler::new_nested(query)?)),
                join.alias.clone().or_else(|| query.alias.clone()),
            ),
        };

        let on = match (kind, &join.on) {
            (sql::ast::JoinKind::Cross, None) => None,
            (sql::ast::JoinKind::Cross, Some(_)) => {
                return Err(ValidationError::UnexpectedJoinPredicate.into())
            }
            (_, None) => return Err(ValidationError::MissingJoinPredicate(join.kind.clone()).into()),
            (_, Some(filter)) => Some(FilterCompiler::new(filter)?),
        };

        check_alias(join.alias.as_deref(), "join alias")?;

        Ok(JoinCompiler {
            kind,
            table,
            alias,
            on,
            lifecycle: Lifecycle::Constructed,
        })
    }
}

fn translate_join_kind(kind: &str) -> Result<sql::ast::JoinKind, Error> {
    match kind.to_ascii_lowercase().as_str() {
        "inner" => Ok(sql::ast::JoinKind::Inner),
        "left" => Ok(sql::ast::JoinKind::LeftOuter),
        "right" => Ok(sql::ast::JoinKind::RightOuter),
        "full" => Ok(sql::ast::JoinKind::FullOuter),
        "cross" => Ok(sql::ast::JoinKind::Cross),
        _ => Err(ValidationError::InvalidJoinType(kind.to_string()).into()),
    }
}

impl Compile for JoinCompiler {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn compile(&mut self, renderer: &sql::Renderer) -> Result<sql::ast::Fragment, Error> {
        let alias = self.alias.clone().map(sql::helpers::make_table_alias);
        let source = match &mut self.table {
            JoinTable::Name(name) => sql::ast::TableSource::Table {
                name: name.clone(),
                alias,
            },
            JoinTable::Query(query) => sql::ast::TableSource::Subquery {
                query: query.build(renderer)?,
                alias,
            },
        };
        let on = self
            .on
            .as_mut()
            .map(|filter| filter.build(renderer))
            .transpose()?;

        let mut fragment = sql::ast::Fragment::new();
        sql::ast::Join {
            kind: self.kind,
            source,
            on,
        }
        .to_sql(&mut fragment);
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn compile(join: serde_json::Value) -> Result<sql::string::SQL, Error> {
        let renderer = sql::Renderer::default();
        let join: models::Join = serde_json::from_value(join).unwrap();
        let mut compiler = JoinCompiler::new(&join, false)?;
        Ok(renderer.to_sql(&compiler.build(&renderer)?))
    }

    #[test]
    fn left_join_on_a_table() {
        let sql = compile(serde_json::json!({
            "type": "left",
            "table": "artists",
            "alias": "ar",
            "on": {"column": "ar.id", "operator": "=", "rightColumn": {"column": "albums.artist_id"}}
        }))
        .unwrap();
        assert_eq!(
            sql.sql,
            "LEFT JOIN `artists` AS `ar` ON `ar`.`id` = `albums`.`artist_id`"
        );
    }

    #[test]
    fn join_on_a_derived_table() {
        let sql = compile(serde_json::json!({
            "type": "INNER",
            "table": {"action": "subquery", "table": "tracks", "alias": "t", "filter": {"column": "ms", "operator": ">", "value": 1000}},
            "on": {"column": "t.album_id", "operator": "=", "rightColumn": {"column": "albums.id"}}
        }))
        .unwrap();
        assert_eq!(
            sql.sql,
            "INNER JOIN (SELECT * FROM `tracks` WHERE `ms` > ?) AS `t` ON `t`.`album_id` = `albums`.`id`"
        );
        assert_eq!(sql.params, vec![sql::string::Param::Int(1000)]);
    }

    #[test]
    fn cross_join() {
        assert_eq!(
            compile(serde_json::json!({"type": "cross", "table": "sizes"}))
                .unwrap()
                .sql,
            "CROSS JOIN `sizes`"
        );
        assert_eq!(
            compile(serde_json::json!({
                "type": "cross",
                "table": "sizes",
                "on": {"column": "a", "isNull": true}
            }))
            .unwrap_err(),
            Error::Validation(ValidationError::UnexpectedJoinPredicate)
        );
    }

    #[test]
    fn invalid_joins() {
        assert_eq!(
            compile(serde_json::json!({"type": "sideways", "table": "t"})).unwrap_err(),
            Error::Validation(ValidationError::InvalidJoinType("sideways".to_string()))
        );
        assert_eq!(
            compile(serde_json::json!({"type": "inner", "table": "t"})).unwrap_err(),
            Error::Validation(ValidationError::MissingJoinPredicate("inner".to_string()))
        );
        assert_eq!(
            compile(serde_json::json!({"type": "inner", "on": {"column": "a", "isNull": true}}))
                .unwrap_err(),
            Error::Validation(ValidationError::MissingJoinTable)
        );
    }

    #[test]
    fn derived_table_inside_a_derived_table() {
        let join: models::Join = serde_json::from_value(serde_json::json!({
            "type": "cross",
            "table": {"action": "subquery", "table": "t"}
        }))
        .unwrap();
        assert_eq!(
            JoinCompiler::new(&join, true).unwrap_err(),
            Error::Validation(ValidationError::NestingTooDeep)
        );
    }
}
