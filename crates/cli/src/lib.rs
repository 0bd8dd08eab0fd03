//! The `parcelql` command line: translate query files and manage the configuration.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use tokio::fs;
use tokio::io::AsyncReadExt;

use parcelql_configuration::environment::Environment;
use parcelql_configuration::ParsedConfiguration;
use query_engine_models::models;
use query_engine_sql::sql;
use query_engine_translation::translation;

/// The various contextual bits and bobs we need to run.
pub struct Context<Env: Environment> {
    pub context_path: PathBuf,
    pub environment: Env,
}

/// The command invoked by the user.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Translate a query into SQL and its parameters.
    Translate {
        /// Format the SQL and list the parameters one per line.
        #[arg(long)]
        pretty: bool,
        /// The JSON query to translate. Read from standard input when omitted.
        file: Option<PathBuf>,
    },
    /// Write a default configuration file and its JSON schema.
    Initialize,
    /// Print the JSON schema of a query.
    PrintSchema,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a configuration already exists at {0}")]
    ConfigurationExists(PathBuf),
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] serde_json::Error),
}

/// Run a command in a given context, returning what should be printed.
pub async fn run(command: Command, context: Context<impl Environment>) -> anyhow::Result<String> {
    match command {
        Command::Translate { pretty, file } => translate(context, file.as_deref(), pretty).await,
        Command::Initialize => initialize(context).await,
        Command::PrintSchema => print_schema(),
    }
}

async fn translate(
    context: Context<impl Environment>,
    file: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<String> {
    let parsed = parcelql_configuration::parse_configuration(&context.context_path).await?;
    let configuration =
        parcelql_configuration::make_runtime_configuration(parsed, context.environment)?;

    let input = match file {
        Some(file) => fs::read_to_string(file).await?,
        None => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            input
        }
    };
    let query: models::Query = serde_json::from_str(&input).map_err(Error::InvalidQuery)?;

    let statement =
        translation::query::translate(&sql::Renderer::new(configuration.dialect), &query)?;

    if pretty {
        Ok(prettify(&statement))
    } else {
        Ok(serde_json::to_string_pretty(&statement)? + "\n")
    }
}

/// Formatted SQL, then one `index: value` line per parameter.
fn prettify(statement: &sql::string::SQL) -> String {
    let formatted = sqlformat::format(
        &statement.sql,
        &sqlformat::QueryParams::None,
        sqlformat::FormatOptions::default(),
    );
    let mut output = format!("{formatted}\n");
    if !statement.params.is_empty() {
        output.push('\n');
    }
    for (index, param) in statement.params.iter().enumerate() {
        let value = serde_json::to_string(param).unwrap_or_default();
        output.push_str(&format!("{}: {value}\n", index + 1));
    }
    output
}

async fn initialize(context: Context<impl Environment>) -> anyhow::Result<String> {
    let configuration_file = context
        .context_path
        .join(parcelql_configuration::CONFIGURATION_FILENAME);
    if fs::try_exists(&configuration_file).await? {
        return Err(Error::ConfigurationExists(configuration_file).into());
    }

    parcelql_configuration::write_parsed_configuration(
        ParsedConfiguration::initial(),
        &context.context_path,
    )
    .await?;
    tracing::info!(path = %context.context_path.display(), "wrote configuration");
    Ok(String::new())
}

fn print_schema() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(models::Query);
    Ok(serde_json::to_string_pretty(&schema)? + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcelql_configuration::environment::FixedEnvironment;
    use similar_asserts::assert_eq;

    fn context(dir: &Path, environment: FixedEnvironment) -> Context<FixedEnvironment> {
        Context {
            context_path: dir.to_owned(),
            environment,
        }
    }

    async fn write_query(dir: &Path) -> PathBuf {
        let file = dir.join("query.json");
        fs::write(
            &file,
            r#"{"action": "query", "table": "albums", "filter": {"column": "id", "operator": "=", "value": 1}}"#,
        )
        .await
        .unwrap();
        file
    }

    #[tokio::test]
    async fn translates_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_query(dir.path()).await;

        let output = run(
            Command::Translate {
                pretty: false,
                file: Some(file),
            },
            context(dir.path(), FixedEnvironment::default()),
        )
        .await
        .unwrap();

        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&output).unwrap(),
            serde_json::json!({"sql": "SELECT * FROM `albums` WHERE `id` = ?", "params": [1]})
        );
    }

    #[tokio::test]
    async fn environment_selects_the_dialect() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_query(dir.path()).await;

        let output = run(
            Command::Translate {
                pretty: false,
                file: Some(file),
            },
            context(
                dir.path(),
                FixedEnvironment::from([("PARCELQL_DIALECT".into(), "postgres".into())]),
            ),
        )
        .await
        .unwrap();

        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&output).unwrap()["sql"],
            serde_json::json!(r#"SELECT * FROM "albums" WHERE "id" = $1"#)
        );
    }

    #[tokio::test]
    async fn pretty_output_lists_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_query(dir.path()).await;

        let output = run(
            Command::Translate {
                pretty: true,
                file: Some(file),
            },
            context(dir.path(), FixedEnvironment::default()),
        )
        .await
        .unwrap();

        assert!(output.contains("`albums`"), "{output}");
        assert!(output.ends_with("\n\n1: 1\n"), "{output}");
    }

    #[tokio::test]
    async fn initialize_writes_the_configuration_once() {
        let dir = tempfile::tempdir().unwrap();

        run(
            Command::Initialize,
            context(dir.path(), FixedEnvironment::default()),
        )
        .await
        .unwrap();
        assert_eq!(
            parcelql_configuration::parse_configuration(dir.path())
                .await
                .unwrap(),
            ParsedConfiguration::initial()
        );

        let error = run(
            Command::Initialize,
            context(dir.path(), FixedEnvironment::default()),
        )
        .await
        .unwrap_err();
        assert!(error.to_string().starts_with("a configuration already exists"));
    }

    #[tokio::test]
    async fn invalid_queries_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("query.json");
        fs::write(&file, r#"{"action": "query", "table": "t", "where": {}}"#)
            .await
            .unwrap();

        let error = run(
            Command::Translate {
                pretty: false,
                file: Some(file),
            },
            context(dir.path(), FixedEnvironment::default()),
        )
        .await
        .unwrap_err();
        assert!(error.to_string().starts_with("invalid query"), "{error}");
    }

    #[test]
    fn schema_describes_queries() {
        let schema: serde_json::Value = serde_json::from_str(&print_schema().unwrap()).unwrap();
        assert_eq!(schema["title"], "Query");
    }
}
