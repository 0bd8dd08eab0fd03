//! Configuration used at runtime.

use query_engine_sql::sql::dialect::Dialect;

use crate::environment::Environment;
use crate::error::MakeRuntimeConfigurationError;
use crate::version1::{ParsedConfiguration, DEFAULT_DIALECT_VARIABLE};

/// The 'Configuration' type collects all the information necessary to translate queries.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration'.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub dialect: Dialect,
}

/// Apply the environment to a parsed configuration.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
    environment: impl Environment,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    let dialect = match environment.read(DEFAULT_DIALECT_VARIABLE)? {
        None => parsed_config.dialect,
        Some(value) => {
            let dialect = value.parse::<Dialect>().map_err(|err| {
                MakeRuntimeConfigurationError::InvalidDialect {
                    variable: DEFAULT_DIALECT_VARIABLE.to_string(),
                    message: err.to_string(),
                }
            })?;
            tracing::debug!(%dialect, "dialect set from the environment");
            dialect
        }
    };

    Ok(Configuration { dialect })
}
