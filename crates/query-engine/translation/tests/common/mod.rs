use std::fs;
use std::path::PathBuf;

use parcelql_configuration::environment::FixedEnvironment;
use query_engine_sql::sql;
use query_engine_translation::translation;

/// Translate `tests/goldenfiles/<testname>/request.json`, using the configuration in the same
/// directory when there is one. Returns the SQL followed by the numbered parameters.
pub async fn test_translation(testname: &str) -> anyhow::Result<String> {
    let directory = PathBuf::from("tests/goldenfiles").join(testname);

    let parsed_configuration = parcelql_configuration::parse_configuration(&directory).await?;
    let configuration = parcelql_configuration::make_runtime_configuration(
        parsed_configuration,
        FixedEnvironment::default(),
    )?;

    let request = serde_json::from_str(&fs::read_to_string(directory.join("request.json"))?)?;

    let query = translation::query::translate(&sql::Renderer::new(configuration.dialect), &request)?;
    let params: Vec<(usize, &sql::string::Param)> = query
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1, p))
        .collect();

    Ok(format!("{}\n\n{:?}", query.sql, params))
}
