//! Column references.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::{deserialize_node, shape_error};

/// A column in a select list, a function parameter, or any other place an expression is expected.
/// The variant is chosen by the fields present.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum Column {
    Named(NamedColumn),
    Function(FunctionColumn),
    Value(ValueColumn),
}

/// A column referenced by name, e.g. `id`, `users.id` or `*`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NamedColumn {
    pub column: String,
    /// Cast the column to this type, rendered as `column::type`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A function call over other columns, e.g. `COUNT(id)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FunctionColumn {
    pub function: String,
    #[serde(default)]
    pub parameters: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A literal value, bound as a parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ValueColumn {
    pub value: serde_json::Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Places that take a column accept either a bare name or a full column node.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum ColumnRef {
    Name(String),
    Column(Column),
}

const COLUMN_KEYS: &[&str] = &["function", "column", "value"];

impl<'de> Deserialize<'de> for Column {
    fn deserialize<D>(deserializer: D) -> Result<Column, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let key = match &value {
            serde_json::Value::Object(fields) => COLUMN_KEYS
                .iter()
                .find(|key| fields.contains_key(**key))
                .copied(),
            _ => None,
        };
        match key {
            Some("function") => deserialize_node(value).map(Column::Function),
            Some("column") => deserialize_node(value).map(Column::Named),
            Some("value") => deserialize_node(value).map(Column::Value),
            _ => Err(shape_error("column", COLUMN_KEYS, &value)),
        }
    }
}

impl<'de> Deserialize<'de> for ColumnRef {
    fn deserialize<D>(deserializer: D) -> Result<ColumnRef, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(name) => Ok(ColumnRef::Name(name)),
            value => deserialize_node(value).map(ColumnRef::Column),
        }
    }
}

impl Column {
    /// A plain named column without cast or alias.
    pub fn named(name: impl Into<String>) -> Column {
        Column::Named(NamedColumn {
            column: name.into(),
            cast: None,
            alias: None,
        })
    }

    /// The `*` column used when a query does not list any columns.
    pub fn star() -> Column {
        Column::named("*")
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            Column::Named(NamedColumn { alias, .. })
            | Column::Function(FunctionColumn { alias, .. })
            | Column::Value(ValueColumn { alias, .. }) => alias.as_deref(),
        }
    }
}

impl ColumnRef {
    pub fn into_column(self) -> Column {
        match self {
            ColumnRef::Name(name) => Column::named(name),
            ColumnRef::Column(column) => column,
        }
    }
}

impl From<ColumnRef> for Column {
    fn from(value: ColumnRef) -> Self {
        value.into_column()
    }
}
