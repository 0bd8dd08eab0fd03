//! The root query node and its clauses.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::column::{Column, ColumnRef};
use super::filter::Filter;
use super::{deserialize_node, SingleOrList};

/// A query description. Used at the top level, and as the table of another query or join.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Query {
    /// One of `query`, `subquery` or `temporary_table`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// The table to select from: a table name, or a query selected from as a derived table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    /// Alias given to this query when it is used as a derived table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Defaults to `*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Column>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<SingleOrList<Join>>,
    /// Aliases are ignored here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<Column>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub having: Option<Filter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Vec<OrderByElement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct: Option<Distinct>,
}

/// The source of rows for a query or a join.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum Table {
    Name(String),
    Query(Box<Query>),
}

/// A join against a table or a derived table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Join {
    /// One of `inner`, `left`, `right`, `full` or `cross`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// The join predicate. Required for every join type except `cross`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<Filter>,
}

/// A single element of an ORDER BY clause.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OrderByElement {
    pub column: ColumnRef,
    /// `asc` or `desc`, defaults to `asc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

/// `DISTINCT cols` or `DISTINCT ON (on) cols`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Distinct {
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<Column>,
}

impl<'de> Deserialize<'de> for Table {
    fn deserialize<D>(deserializer: D) -> Result<Table, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(name) => Ok(Table::Name(name)),
            value => deserialize_node(value).map(|query| Table::Query(Box::new(query))),
        }
    }
}

impl Query {
    /// The joins in the order they were given.
    pub fn joins(&self) -> &[Join] {
        self.join.as_ref().map_or(&[], SingleOrList::as_slice)
    }
}
