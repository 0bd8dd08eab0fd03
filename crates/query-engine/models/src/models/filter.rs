//! Filter predicates, used in `filter`, `having` and join `on` clauses.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::column::{Column, ColumnRef};
use super::{deserialize_node, shape_error};

/// A boolean predicate. The variant is chosen by the fields present.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum Filter {
    Comparison(ComparisonFilter),
    In(InFilter),
    Like(LikeFilter),
    IsNull(IsNullFilter),
    And(AndFilter),
    Or(OrFilter),
    Not(NotFilter),
}

/// `column operator value` or `column operator rightColumn`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ComparisonFilter {
    pub column: ColumnRef,
    pub operator: String,
    /// Absent when comparing against `rightColumn`. A JSON `null` is `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<serde_json::Value>,
    #[serde(
        rename = "rightColumn",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub right_column: Option<Column>,
}

/// `column IN (values...)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InFilter {
    pub column: ColumnRef,
    #[serde(rename = "in")]
    pub values: Vec<serde_json::Value>,
}

/// `column LIKE pattern`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LikeFilter {
    pub column: ColumnRef,
    #[serde(rename = "like")]
    pub pattern: serde_json::Value,
}

/// `column IS NULL` when `isNull` is true, `column IS NOT NULL` otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct IsNullFilter {
    pub column: ColumnRef,
    #[serde(rename = "isNull")]
    pub is_null: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AndFilter {
    pub and: Vec<Filter>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OrFilter {
    pub or: Vec<Filter>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NotFilter {
    pub not: Box<Filter>,
}

/// Keys that select a filter variant, in the order they are looked for.
const FILTER_KEYS: &[&str] = &["operator", "in", "like", "isNull", "and", "or", "not"];

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D>(deserializer: D) -> Result<Filter, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let key = match &value {
            serde_json::Value::Object(fields) => FILTER_KEYS
                .iter()
                .find(|key| fields.contains_key(**key))
                .copied(),
            _ => None,
        };
        match key {
            Some("operator") => deserialize_node(value).map(Filter::Comparison),
            Some("in") => deserialize_node(value).map(Filter::In),
            Some("like") => deserialize_node(value).map(Filter::Like),
            Some("isNull") => deserialize_node(value).map(Filter::IsNull),
            Some("and") => deserialize_node(value).map(Filter::And),
            Some("or") => deserialize_node(value).map(Filter::Or),
            Some("not") => deserialize_node(value).map(Filter::Not),
            _ => Err(shape_error("filter", FILTER_KEYS, &value)),
        }
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}
