use parcelql_configuration::environment::FixedEnvironment;
use parcelql_configuration::error::{MakeRuntimeConfigurationError, ParseConfigurationError};
use parcelql_configuration::{
    make_runtime_configuration, parse_configuration, write_parsed_configuration, Configuration,
    ParsedConfiguration, CONFIGURATION_FILENAME, CONFIGURATION_JSONSCHEMA_FILENAME,
};
use query_engine_sql::sql::dialect::Dialect;
use similar_asserts::assert_eq;

#[tokio::test]
async fn missing_file_gives_the_initial_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parse_configuration(dir.path()).await.unwrap();
    assert_eq!(parsed, ParsedConfiguration::initial());
    assert_eq!(parsed.dialect, Dialect::Sqlite);
}

#[tokio::test]
async fn write_then_parse() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = ParsedConfiguration {
        version: 1,
        dialect: Dialect::Postgres,
    };
    write_parsed_configuration(parsed.clone(), dir.path())
        .await
        .unwrap();

    assert!(dir.path().join(CONFIGURATION_JSONSCHEMA_FILENAME).exists());
    assert_eq!(parse_configuration(dir.path()).await.unwrap(), parsed);
}

#[tokio::test]
async fn rejects_unsupported_versions() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIGURATION_FILENAME),
        r#"{"version": 2, "dialect": "mysql"}"#,
    )
    .unwrap();
    assert!(matches!(
        parse_configuration(dir.path()).await,
        Err(ParseConfigurationError::UnsupportedVersion(2))
    ));
}

#[tokio::test]
async fn rejects_unknown_dialects_and_fields() {
    let dir = tempfile::tempdir().unwrap();
    for contents in [
        r#"{"version": 1, "dialect": "oracle"}"#,
        r#"{"version": 1, "connectionUri": "postgres://"}"#,
    ] {
        std::fs::write(dir.path().join(CONFIGURATION_FILENAME), contents).unwrap();
        assert!(matches!(
            parse_configuration(dir.path()).await,
            Err(ParseConfigurationError::ParseError { line: 1, .. })
        ));
    }
}

#[test]
fn environment_overrides_the_dialect() {
    let configuration = make_runtime_configuration(
        ParsedConfiguration::initial(),
        FixedEnvironment::from([("PARCELQL_DIALECT".into(), "postgresql".into())]),
    )
    .unwrap();
    assert_eq!(
        configuration,
        Configuration {
            dialect: Dialect::Postgres
        }
    );

    let configuration =
        make_runtime_configuration(ParsedConfiguration::initial(), FixedEnvironment::default())
            .unwrap();
    assert_eq!(configuration.dialect, Dialect::Sqlite);
}

#[test]
fn invalid_dialect_in_the_environment() {
    let error = make_runtime_configuration(
        ParsedConfiguration::initial(),
        FixedEnvironment::from([("PARCELQL_DIALECT".into(), "oracle".into())]),
    )
    .unwrap_err();
    assert!(matches!(
        error,
        MakeRuntimeConfigurationError::InvalidDialect { .. }
    ));
    assert!(error.to_string().contains("\"oracle\""), "{error}");
}

#[test]
fn schema_lists_the_dialects() {
    let schema = serde_json::to_string(&schemars::schema_for!(ParsedConfiguration)).unwrap();
    for dialect in ["\"sqlite\"", "\"mysql\"", "\"postgres\""] {
        assert!(schema.contains(dialect), "{dialect} missing from {schema}");
    }
}
