//! Translate column nodes: plain names, function calls and literal values.

use query_engine_models::models;
use query_engine_sql::sql;

use super::helpers::{check_alias, check_cast_type, check_function_name, check_identifier};
use super::values::translate_json_value;
use crate::translation::error::Error;
use crate::translation::lifecycle::{Compile, Lifecycle};

/// Compiles a single column node.
///
/// Columns compiled for the select list keep their alias (`expr AS alias`). Everywhere else,
/// function parameters, filters, group by and order by, the alias is dropped.
#[derive(Debug)]
pub struct ColumnCompiler {
    column: models::Column,
    with_alias: bool,
    parameters: Vec<ColumnCompiler>,
    lifecycle: Lifecycle,
}

impl ColumnCompiler {
    /// A column of the outer select list.
    pub fn new(column: models::Column) -> Result<ColumnCompiler, Error> {
        ColumnCompiler::construct(column, true)
    }

    /// A column used inside another expression.
    pub fn nested(column: models::Column) -> Result<ColumnCompiler, Error> {
        ColumnCompiler::construct(column, false)
    }

    fn construct(column: models::Column, with_alias: bool) -> Result<ColumnCompiler, Error> {
        match &column {
            models::Column::Named(named) => {
                check_identifier(&named.column, "column")?;
                if let Some(cast) = &named.cast {
                    check_cast_type(cast)?;
                }
            }
            models::Column::Function(function) => {
                check_function_name(&function.function)?;
            }
            models::Column::Value(value) => {
                translate_json_value(&value.value)?;
                if let Some(cast) = &value.cast {
                    check_cast_type(cast)?;
                }
            }
        }
        check_alias(column.alias(), "column alias")?;

        Ok(ColumnCompiler {
            column,
            with_alias,
            parameters: vec![],
            lifecycle: Lifecycle::Constructed,
        })
    }
}

impl Compile for ColumnCompiler {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    /// Function parameters are validated only once the function itself is being built.
    fn prepare(&mut self, _renderer: &sql::Renderer) -> Result<(), Error> {
        if let models::Column::Function(function) = &self.column {
            self.parameters = function
                .parameters
                .iter()
                .cloned()
                .map(ColumnCompiler::nested)
                .collect::<Result<Vec<_>, Error>>()?;
        }
        Ok(())
    }

    fn compile(&mut self, renderer: &sql::Renderer) -> Result<sql::ast::Fragment, Error> {
        let expression = match &self.column {
            models::Column::Named(named) => {
                with_cast(renderer, renderer.identifier(&named.column), named.cast.as_deref())?
            }
            models::Column::Function(function) => {
                let parameters = self
                    .parameters
                    .iter_mut()
                    .map(|parameter| parameter.build(renderer).map(sql::ast::Binding::from))
                    .collect::<Result<Vec<_>, Error>>()?;
                let spots = vec!["?"; parameters.len()].join(", ");
                renderer.raw(&format!("{}({spots})", function.function), parameters)?
            }
            models::Column::Value(value) => {
                let param = translate_json_value(&value.value)?;
                with_cast(renderer, renderer.value(param), value.cast.as_deref())?
            }
        };

        match self.column.alias() {
            Some(alias) if self.with_alias => Ok(renderer.raw(
                "? AS ?",
                vec![
                    expression.into(),
                    sql::ast::Binding::Alias(alias.to_string()),
                ],
            )?),
            _ => Ok(expression),
        }
    }
}

/// `expression::type`
fn with_cast(
    renderer: &sql::Renderer,
    expression: sql::ast::Fragment,
    cast: Option<&str>,
) -> Result<sql::ast::Fragment, Error> {
    match cast {
        None => Ok(expression),
        Some(cast) => Ok(renderer.raw(&format!("?::{cast}"), vec![expression.into()])?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::error::ValidationError;
    use similar_asserts::assert_eq;

    fn compile(column: serde_json::Value) -> Result<sql::string::SQL, Error> {
        let renderer = sql::Renderer::default();
        let mut compiler = ColumnCompiler::new(serde_json::from_value(column).unwrap())?;
        Ok(renderer.to_sql(&compiler.build(&renderer)?))
    }

    #[test]
    fn star_is_not_quoted() {
        assert_eq!(compile(serde_json::json!({"column": "*"})).unwrap().sql, "*");
        assert_eq!(
            compile(serde_json::json!({"column": "albums.*"})).unwrap().sql,
            "`albums`.*"
        );
    }

    #[test]
    fn cast_and_alias() {
        let sql = compile(serde_json::json!({"column": "a.id", "type": "text", "alias": "id"}))
            .unwrap();
        assert_eq!(sql.sql, "`a`.`id`::text AS `id`");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn dotted_alias_is_one_name() {
        assert_eq!(
            compile(serde_json::json!({"column": "a", "alias": "x.y"})).unwrap().sql,
            "`a` AS `x.y`"
        );
        assert_eq!(
            compile(serde_json::json!({"value": 1, "alias": "*"})).unwrap().sql,
            "? AS `*`"
        );
    }

    #[test]
    fn function_parameters_keep_their_order() {
        let sql = compile(serde_json::json!({
            "function": "COALESCE",
            "parameters": [{"column": "a", "alias": "dropped"}, {"value": 0}, {"function": "NOW"}],
            "alias": "total"
        }))
        .unwrap();
        assert_eq!(sql.sql, "COALESCE(`a`, ?, NOW()) AS `total`");
        assert_eq!(sql.params, vec![sql::string::Param::Int(0)]);
    }

    #[test]
    fn nested_columns_drop_the_alias() {
        let renderer = sql::Renderer::default();
        let mut compiler = ColumnCompiler::nested(models::Column::Named(models::NamedColumn {
            column: "a".to_string(),
            cast: None,
            alias: Some("b".to_string()),
        }))
        .unwrap();
        assert_eq!(
            renderer.to_sql(&compiler.build(&renderer).unwrap()).sql,
            "`a`"
        );
    }

    #[test]
    fn invalid_function_name() {
        assert_eq!(
            compile(serde_json::json!({"function": "COUNT(*); --"})).unwrap_err(),
            Error::Validation(ValidationError::InvalidFunctionName(
                "COUNT(*); --".to_string()
            ))
        );
    }

    #[test]
    fn invalid_parameter_fails_at_build() {
        let column: models::Column = serde_json::from_value(serde_json::json!({
            "function": "COUNT",
            "parameters": [{"column": "a", "type": "int; --"}]
        }))
        .unwrap();
        let mut compiler = ColumnCompiler::new(column).unwrap();
        assert_eq!(
            compiler.build(&sql::Renderer::default()).unwrap_err(),
            Error::Validation(ValidationError::InvalidCastType("int; --".to_string()))
        );
    }
}
