use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use parcelql_cli::{run, Command, Context};
use parcelql_configuration::environment::ProcessEnvironment;

/// Translate JSON query descriptions into parameterized SQL.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// The directory holding `configuration.json`.
    #[arg(
        long = "configuration",
        value_name = "DIRECTORY",
        env = "PARCELQL_CONFIGURATION",
        default_value = ".",
        global = true
    )]
    configuration: PathBuf,
    #[command(subcommand)]
    subcommand: Command,
}

#[tokio::main]
pub async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let context = Context {
        context_path: args.configuration,
        environment: ProcessEnvironment,
    };
    match run(args.subcommand, context).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
