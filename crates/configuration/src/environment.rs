//! Access to environment variables, so that tests can supply their own.

use std::collections::BTreeMap;

/// Reads environment variables.
pub trait Environment {
    /// `Ok(None)` when the variable is not set.
    fn read(&self, variable: &str) -> Result<Option<String>, Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("the environment variable {0} is not valid unicode")]
    NonUnicodeValue(String),
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn read(&self, variable: &str) -> Result<Option<String>, Error> {
        match std::env::var(variable) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(Error::NonUnicodeValue(variable.to_string()))
            }
        }
    }
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default)]
pub struct FixedEnvironment(BTreeMap<String, String>);

impl Environment for FixedEnvironment {
    fn read(&self, variable: &str) -> Result<Option<String>, Error> {
        Ok(self.0.get(variable).cloned())
    }
}

impl<const N: usize> From<[(String, String); N]> for FixedEnvironment {
    fn from(value: [(String, String); N]) -> Self {
        FixedEnvironment(value.into())
    }
}

