//! Handle the translation of a query node into a SELECT statement.

use query_engine_models::models;
use query_engine_sql::sql;

use super::fields::ColumnCompiler;
use super::filtering::FilterCompiler;
use super::helpers::check_alias;
use super::joins::JoinCompiler;
use super::sorting::OrderByCompiler;
use crate::translation::error::{BuildError, Error, ValidationError};
use crate::translation::lifecycle::{Compile, Lifecycle};

/// What the query node is used for. Anything other than a top-level `query` is a derived table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Query,
    Subquery,
    TemporaryTable,
}

impl Action {
    fn parse(action: Option<&str>) -> Result<Action, ValidationError> {
        match action {
            Some("query") => Ok(Action::Query),
            Some("subquery") => Ok(Action::Subquery),
            Some("temporary_table") => Ok(Action::TemporaryTable),
            other => Err(ValidationError::InvalidAction(other.map(str::to_string))),
        }
    }
}

/// Compiles a query node and everything below it.
///
/// Construction validates the whole tree except the select list, whose column compilers are
/// created when the query is prepared.
#[derive(Debug)]
pub struct QueryCompiler {
    action: Action,
    nested: bool,
    table: Source,
    alias: Option<String>,
    column_nodes: Vec<models::Column>,
    columns: Option<Vec<ColumnCompiler>>,
    distinct: Option<DistinctCompiler>,
    joins: Vec<JoinCompiler>,
    filter: Option<FilterCompiler>,
    group_by: Vec<ColumnCompiler>,
    having: Option<FilterCompiler>,
    order_by: Option<OrderByCompiler>,
    limit: Option<u64>,
    offset: Option<u64>,
    lifecycle: Lifecycle,
}

#[derive(Debug)]
enum Source {
    Table(String),
    Query(Box<QueryCompiler>),
}

#[derive(Debug)]
struct DistinctCompiler {
    on: Option<ColumnCompiler>,
    columns: Vec<ColumnCompiler>,
}

impl QueryCompiler {
    /// A top-level query. It is a derived table unless its action is `query`.
    pub fn new(query: &models::Query) -> Result<QueryCompiler, Error> {
        QueryCompiler::construct(query, false)
    }

    /// A query used as the table of another query or join. Its action is forced to
    /// `temporary_table` and its own table must be a plain table name.
    pub fn new_nested(query: &models::Query) -> Result<QueryCompiler, Error> {
        QueryCompiler::construct(query, true)
    }

    fn construct(query: &models::Query, forced: bool) -> Result<QueryCompiler, Error> {
        let action = if forced {
            Action::TemporaryTable
        } else {
            Action::parse(query.action.as_deref())?
        };
        let nested = forced || action != Action::Query;

        let table = match &query.table {
            None => return Err(ValidationError::MissingTable.into()),
            Some(models::Table::Name(name)) if name.is_empty() => {
                return Err(ValidationError::MissingTable.into())
            }
            Some(models::Table::Name(name)) => Source::Table(name.clone()),
            Some(models::Table::Query(_)) if nested => {
                return Err(ValidationError::NestingTooDeep.into())
            }
            Some(models::Table::Query(inner)) => {
                Source::Query(Box::new(QueryCompiler::new_nested(inner)?))
            }
        };
        check_alias(query.alias.as_deref(), "query alias")?;

        let joins = query
            .joins()
            .iter()
            .map(|join| JoinCompiler::new(join, nested))
            .collect::<Result<Vec<_>, Error>>()?;

        let filter = query.filter.as_ref().map(FilterCompiler::new).transpose()?;

        let group_by = query
            .group_by
            .iter()
            .flatten()
            .cloned()
            .map(ColumnCompiler::nested)
            .collect::<Result<Vec<_>, Error>>()?;

        let having = query.having.as_ref().map(FilterCompiler::new).transpose()?;

        let order_by = query
            .order_by
            .as_deref()
            .map(OrderByCompiler::new)
            .transpose()?;

        let distinct = query
            .distinct
            .as_ref()
            .map(DistinctCompiler::new)
            .transpose()?;

        // A DISTINCT list replaces the default `*`.
        let column_nodes = match &query.columns {
            Some(columns) => columns.clone(),
            None if distinct.is_some() => vec![],
            None => vec![models::Column::star()],
        };

        Ok(QueryCompiler {
            action,
            nested,
            table,
            alias: query.alias.clone(),
            column_nodes,
            columns: None,
            distinct,
            joins,
            filter,
            group_by,
            having,
            order_by,
            limit: query.limit,
            offset: query.offset,
            lifecycle: Lifecycle::Constructed,
        })
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// The alias this query gets when it is used as a derived table.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// `DISTINCT cols` or `DISTINCT ON (on) cols`.
    pub fn compile_distinct(
        &mut self,
        renderer: &sql::Renderer,
    ) -> Result<sql::ast::Fragment, Error> {
        let Some(distinct) = &mut self.distinct else {
            return Err(BuildError::MissingClause("distinct").into());
        };
        let columns = distinct
            .columns
            .iter_mut()
            .map(|column| column.build(renderer))
            .collect::<Result<Vec<_>, Error>>()?;
        let columns = sql::helpers::join_fragments(&columns, ", ");

        match &mut distinct.on {
            Some(on) => Ok(renderer.raw(
                "DISTINCT ON (?) ?",
                vec![on.build(renderer)?.into(), columns.into()],
            )?),
            None => Ok(renderer.raw("DISTINCT ?", vec![columns.into()])?),
        }
    }
}

impl DistinctCompiler {
    fn new(distinct: &models::Distinct) -> Result<DistinctCompiler, Error> {
        if distinct.columns.is_empty() {
            return Err(ValidationError::EmptyList("distinct.columns").into());
        }
        Ok(DistinctCompiler {
            on: distinct
                .on
                .clone()
                .map(ColumnCompiler::nested)
                .transpose()?,
            columns: distinct
                .columns
                .iter()
                .cloned()
                .map(ColumnCompiler::new)
                .collect::<Result<Vec<_>, Error>>()?,
        })
    }
}

impl Compile for QueryCompiler {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn prepare(&mut self, _renderer: &sql::Renderer) -> Result<(), Error> {
        self.columns = Some(
            self.column_nodes
                .iter()
                .cloned()
                .map(ColumnCompiler::new)
                .collect::<Result<Vec<_>, Error>>()?,
        );
        Ok(())
    }

    fn compile(&mut self, renderer: &sql::Renderer) -> Result<sql::ast::Fragment, Error> {
        let mut select = renderer.select();

        // select list
        let columns = self
            .columns
            .as_mut()
            .ok_or(BuildError::NotPrepared("columns"))?;
        select.select_list.items = columns
            .iter_mut()
            .map(|column| column.build(renderer))
            .collect::<Result<Vec<_>, Error>>()?;
        if self.distinct.is_some() {
            select.select_list.distinct = Some(self.compile_distinct(renderer)?);
        }

        // from
        let source = match &mut self.table {
            Source::Table(name) => sql::ast::TableSource::Table {
                name: name.clone(),
                alias: None,
            },
            // Built eagerly, so the derived table's parameters come before the parent's.
            Source::Query(inner) => sql::ast::TableSource::Subquery {
                query: inner.build(renderer)?,
                alias: inner
                    .alias()
                    .map(|alias| sql::helpers::make_table_alias(alias.to_string())),
            },
        };
        select.from = Some(sql::ast::From(source));

        select.joins = self
            .joins
            .iter_mut()
            .map(|join| join.build(renderer))
            .collect::<Result<Vec<_>, Error>>()?;

        select.where_ = self
            .filter
            .as_mut()
            .map(|filter| filter.build(renderer))
            .transpose()?
            .map(sql::ast::Where);

        select.group_by.elements = self
            .group_by
            .iter_mut()
            .map(|column| column.build(renderer))
            .collect::<Result<Vec<_>, Error>>()?;

        select.having = self
            .having
            .as_mut()
            .map(|having| having.build(renderer))
            .transpose()?
            .map(sql::ast::Having);

        select.order_by = self
            .order_by
            .as_mut()
            .map(|order_by| order_by.build(renderer))
            .transpose()?
            .map(sql::ast::OrderBy);

        select.limit = renderer.limit(
            self.limit.filter(|limit| *limit > 0),
            self.offset.filter(|offset| *offset > 0),
        );

        tracing::debug!(
            action = ?self.action,
            nested = self.nested,
            joins = select.joins.len(),
            "compiled query"
        );
        Ok(renderer.statement(&select))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn query(value: serde_json::Value) -> models::Query {
        serde_json::from_value(value).unwrap()
    }

    fn compile(value: serde_json::Value) -> Result<sql::string::SQL, Error> {
        let renderer = sql::Renderer::default();
        let mut compiler = QueryCompiler::new(&query(value))?;
        Ok(renderer.to_sql(&compiler.build(&renderer)?))
    }

    #[test]
    fn defaults_to_star() {
        assert_eq!(
            compile(serde_json::json!({"action": "query", "table": "albums"}))
                .unwrap()
                .sql,
            "SELECT * FROM `albums`"
        );
    }

    #[test]
    fn invalid_action() {
        assert_eq!(
            compile(serde_json::json!({"action": "delete", "table": "albums"})).unwrap_err(),
            Error::Validation(ValidationError::InvalidAction(Some("delete".to_string())))
        );
        assert_eq!(
            compile(serde_json::json!({"table": "albums"})).unwrap_err(),
            Error::Validation(ValidationError::InvalidAction(None))
        );
    }

    #[test]
    fn missing_table() {
        assert_eq!(
            compile(serde_json::json!({"action": "query"})).unwrap_err(),
            Error::Validation(ValidationError::MissingTable)
        );
        assert_eq!(
            compile(serde_json::json!({"action": "query", "table": ""})).unwrap_err(),
            Error::Validation(ValidationError::MissingTable)
        );
    }

    #[test]
    fn nesting_too_deep() {
        let error = QueryCompiler::new(&query(serde_json::json!({
            "action": "query",
            "table": {
                "action": "subquery",
                "table": {"action": "subquery", "table": "albums"}
            }
        })))
        .unwrap_err();
        assert_eq!(error, Error::Validation(ValidationError::NestingTooDeep));
        assert_eq!(error.to_string(), "only 1 level deep query allowed");
    }

    #[test]
    fn nesting_too_deep_through_a_join() {
        assert_eq!(
            QueryCompiler::new(&query(serde_json::json!({
                "action": "query",
                "table": {
                    "action": "subquery",
                    "table": "albums",
                    "join": {"type": "cross", "table": {"action": "subquery", "table": "tracks"}}
                }
            })))
            .unwrap_err(),
            Error::Validation(ValidationError::NestingTooDeep)
        );
    }

    #[test]
    fn top_level_subquery_cannot_nest() {
        assert_eq!(
            QueryCompiler::new(&query(serde_json::json!({
                "action": "subquery",
                "table": {"action": "subquery", "table": "albums"}
            })))
            .unwrap_err(),
            Error::Validation(ValidationError::NestingTooDeep)
        );
    }

    #[test]
    fn nested_action_is_forced() {
        let compiler = QueryCompiler::new_nested(&query(serde_json::json!({
            "action": "query",
            "table": "albums"
        })))
        .unwrap();
        assert_eq!(compiler.action(), Action::TemporaryTable);
        assert!(compiler.is_nested());
    }

    #[test]
    fn distinct_without_distinct_is_a_build_error() {
        let mut compiler =
            QueryCompiler::new(&query(serde_json::json!({"action": "query", "table": "t"})))
                .unwrap();
        assert_eq!(
            compiler
                .compile_distinct(&sql::Renderer::default())
                .unwrap_err(),
            Error::Build(BuildError::MissingClause("distinct"))
        );
    }

    #[test]
    fn distinct_on() {
        let sql = compile(serde_json::json!({
            "action": "query",
            "table": "tracks",
            "distinct": {"on": {"column": "album_id"}, "columns": [{"column": "album_id"}, {"column": "name", "alias": "n"}]},
            "columns": [{"column": "ms"}]
        }))
        .unwrap();
        assert_eq!(
            sql.sql,
            "SELECT DISTINCT ON (`album_id`) `album_id`, `name` AS `n`, `ms` FROM `tracks`"
        );
    }

    #[test]
    fn distinct_replaces_the_default_columns() {
        let sql = compile(serde_json::json!({
            "action": "query",
            "table": "tracks",
            "distinct": {"columns": [{"column": "genre"}]}
        }))
        .unwrap();
        assert_eq!(sql.sql, "SELECT DISTINCT `genre` FROM `tracks`");
    }

    #[test]
    fn zero_limit_and_offset_are_ignored() {
        let sql = compile(serde_json::json!({
            "action": "query",
            "table": "t",
            "limit": 0,
            "offset": 0
        }))
        .unwrap();
        assert_eq!(sql.sql, "SELECT * FROM `t`");
    }

    #[test]
    fn build_is_idempotent() {
        let renderer = sql::Renderer::default();
        let mut compiler = QueryCompiler::new(&query(serde_json::json!({
            "action": "query",
            "table": "t",
            "filter": {"column": "a", "operator": "=", "value": 1}
        })))
        .unwrap();
        let first = compiler.build(&renderer).unwrap();
        assert_eq!(compiler.build(&renderer).unwrap(), first);
        assert_eq!(*compiler.lifecycle(), Lifecycle::Built(first));
    }
}
