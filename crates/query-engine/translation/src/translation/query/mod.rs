//! Translate an incoming query node.

pub mod fields;
pub mod filtering;
pub mod helpers;
pub mod joins;
pub mod root;
pub mod sorting;
pub mod values;

use query_engine_models::models;
use query_engine_sql::sql;

use super::error::Error;
use super::lifecycle::Compile;

/// Translate a query node into SQL text and its parameters, rendered for the renderer's dialect.
pub fn translate(
    renderer: &sql::Renderer,
    query: &models::Query,
) -> Result<sql::string::SQL, Error> {
    let mut compiler = root::QueryCompiler::new(query)?;
    let fragment = compiler.build(renderer)?;
    let statement = renderer.to_sql(&fragment);

    // log and return
    tracing::info!(
        generated_sql = %statement.sql,
        params = ?statement.params,
        dialect = %renderer.dialect(),
        action = ?compiler.action(),
        nested = compiler.is_nested(),
        "translated query"
    );
    Ok(statement)
}
