//! Structural checks on names that end up in the generated SQL.

use super::super::error::ValidationError;

/// Identifiers are quoted when rendered, so any non-empty name is acceptable.
pub fn check_identifier(name: &str, context: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        Err(ValidationError::InvalidIdentifier(context.to_string()))
    } else {
        Ok(())
    }
}

pub fn check_alias(alias: Option<&str>, context: &str) -> Result<(), ValidationError> {
    match alias {
        Some(alias) => check_identifier(alias, context),
        None => Ok(()),
    }
}

/// Function names are emitted as raw syntax, e.g. `COUNT` or `pg_catalog.lower`.
pub fn check_function_name(name: &str) -> Result<(), ValidationError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidFunctionName(name.to_string()))
    }
}

/// Cast types are emitted as raw syntax, e.g. `integer`, `varchar(20)` or `numeric(10, 2)[]`.
pub fn check_cast_type(cast: &str) -> Result<(), ValidationError> {
    let mut chars = cast.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || "_ (),[]".contains(c));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidCastType(cast.to_string()))
    }
}
