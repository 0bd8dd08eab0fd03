//! Query AST nodes. These are plain data, validated and compiled by the translation crate.

pub mod column;
pub mod filter;
pub mod query;

// re-export without modules
pub use column::*;
pub use filter::*;
pub use query::*;

use schemars::JsonSchema;
use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer, Serialize};

/// Type that accept both a single value and a list of values. Allows for a simpler format when a
/// single value is the common case.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum SingleOrList<T> {
    Single(T),
    List(Vec<T>),
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for SingleOrList<T> {
    fn deserialize<D>(deserializer: D) -> Result<SingleOrList<T>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            list @ serde_json::Value::Array(_) => deserialize_node(list).map(SingleOrList::List),
            single => deserialize_node(single).map(SingleOrList::Single),
        }
    }
}

impl<T> SingleOrList<T> {
    /// The values in the order they were given.
    pub fn as_slice(&self) -> &[T] {
        match self {
            SingleOrList::Single(value) => std::slice::from_ref(value),
            SingleOrList::List(values) => values,
        }
    }
}

/// Deserialize the variant picked for a node. Errors from the variant's own fields, such as an
/// unknown or missing key, are passed through so they name the offending field.
fn deserialize_node<T, E>(value: serde_json::Value) -> Result<T, E>
where
    T: DeserializeOwned,
    E: Error,
{
    serde_json::from_value(value).map_err(E::custom)
}

/// The error for a node whose fields do not select any variant.
fn shape_error<E: Error>(node: &str, keys: &[&str], value: &serde_json::Value) -> E {
    let expected = keys
        .iter()
        .map(|key| format!("`{key}`"))
        .collect::<Vec<_>>()
        .join(", ");
    match value {
        serde_json::Value::Object(fields) => {
            let found = fields
                .keys()
                .map(|key| format!("`{key}`"))
                .collect::<Vec<_>>()
                .join(", ");
            E::custom(format!("{node} must have one of {expected}, found fields [{found}]"))
        }
        other => E::custom(format!(
            "{node} must be an object with one of {expected}, got {other}"
        )),
    }
}
