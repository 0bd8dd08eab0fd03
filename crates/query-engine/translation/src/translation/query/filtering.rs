//! Handle filtering/where clauses translation.

use query_engine_models::models;
use query_engine_sql::sql;

use super::fields::ColumnCompiler;
use super::values::translate_json_value;
use crate::translation::error::{Error, ValidationError};
use crate::translation::lifecycle::{Compile, Lifecycle};

/// Operators accepted by a comparison filter.
pub const SUPPORTED_OPERATORS: &[&str] = &["=", "!=", "<>", "<", "<=", ">", ">="];

/// Compiles `column OP value` or `column OP rightColumn`.
#[derive(Debug)]
pub struct ComparisonCompiler {
    left: ColumnCompiler,
    operator: String,
    right: Operand,
    lifecycle: Lifecycle,
}

#[derive(Debug)]
enum Operand {
    Value(sql::string::Param),
    Column(ColumnCompiler),
}

impl ComparisonCompiler {
    pub fn new(filter: &models::ComparisonFilter) -> Result<ComparisonCompiler, Error> {
        if !SUPPORTED_OPERATORS.contains(&filter.operator.as_str()) {
            return Err(ValidationError::UnsupportedOperator(filter.operator.clone()).into());
        }
        let right = match (&filter.value, &filter.right_column) {
            (Some(value), None) => Operand::Value(translate_json_value(value)?),
            (None, Some(column)) => Operand::Column(ColumnCompiler::nested(column.clone())?),
            _ => return Err(ValidationError::ComparisonOperand.into()),
        };

        Ok(ComparisonCompiler {
            left: ColumnCompiler::nested(filter.column.clone().into_column())?,
            operator: filter.operator.clone(),
            right,
            lifecycle: Lifecycle::Constructed,
        })
    }
}

impl Compile for ComparisonCompiler {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn compile(&mut self, renderer: &sql::Renderer) -> Result<sql::ast::Fragment, Error> {
        let left = self.left.build(renderer)?;
        let right = match &mut self.right {
            Operand::Value(param) => renderer.value(param.clone()),
            Operand::Column(column) => column.build(renderer)?,
        };
        Ok(renderer.raw(
            &format!("? {} ?", self.operator),
            vec![left.into(), right.into()],
        )?)
    }
}

/// Compiles any filter node into a boolean expression.
#[derive(Debug)]
pub struct FilterCompiler {
    kind: FilterKind,
    lifecycle: Lifecycle,
}

#[derive(Debug)]
enum FilterKind {
    Comparison(ComparisonCompiler),
    In {
        column: ColumnCompiler,
        values: Vec<sql::string::Param>,
    },
    Like {
        column: ColumnCompiler,
        pattern: sql::string::Param,
    },
    IsNull {
        column: ColumnCompiler,
        is_null: bool,
    },
    And(Vec<FilterCompiler>),
    Or(Vec<FilterCompiler>),
    Not(Box<FilterCompiler>),
}

impl FilterCompiler {
    /// The whole predicate tree is validated here.
    pub fn new(filter: &models::Filter) -> Result<FilterCompiler, Error> {
        let kind = match filter {
            models::Filter::Comparison(comparison) => {
                FilterKind::Comparison(ComparisonCompiler::new(comparison)?)
            }
            models::Filter::In(models::InFilter { column, values }) => {
                if values.is_empty() {
                    return Err(ValidationError::EmptyList("in").into());
                }
                FilterKind::In {
                    column: ColumnCompiler::nested(column.clone().into_column())?,
                    values: values
                        .iter()
                        .map(translate_json_value)
                        .collect::<Result<Vec<_>, _>>()?,
                }
            }
            models::Filter::Like(models::LikeFilter { column, pattern }) => FilterKind::Like {
                column: ColumnCompiler::nested(column.clone().into_column())?,
                pattern: translate_json_value(pattern)?,
            },
            models::Filter::IsNull(models::IsNullFilter { column, is_null }) => {
                FilterKind::IsNull {
                    column: ColumnCompiler::nested(column.clone().into_column())?,
                    is_null: *is_null,
                }
            }
            models::Filter::And(models::AndFilter { and }) => {
                FilterKind::And(FilterCompiler::children(and, "and")?)
            }
            models::Filter::Or(models::OrFilter { or }) => {
                FilterKind::Or(FilterCompiler::children(or, "or")?)
            }
            models::Filter::Not(models::NotFilter { not }) => {
                FilterKind::Not(Box::new(FilterCompiler::new(not)?))
            }
        };

        Ok(FilterCompiler {
            kind,
            lifecycle: Lifecycle::Constructed,
        })
    }

    fn children(
        filters: &[models::Filter],
        field: &'static str,
    ) -> Result<Vec<FilterCompiler>, Error> {
        if filters.is_empty() {
            return Err(ValidationError::EmptyList(field).into());
        }
        filters.iter().map(FilterCompiler::new).collect()
    }

    fn is_logical(&self) -> bool {
        matches!(self.kind, FilterKind::And(_) | FilterKind::Or(_))
    }
}

impl Compile for FilterCompiler {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn compile(&mut self, renderer: &sql::Renderer) -> Result<sql::ast::Fragment, Error> {
        match &mut self.kind {
            FilterKind::Comparison(comparison) => comparison.build(renderer),
            FilterKind::In { column, values } => {
                let spots = vec!["?"; values.len()].join(", ");
                let mut bindings: Vec<sql::ast::Binding> = vec![column.build(renderer)?.into()];
                bindings.extend(values.iter().cloned().map(sql::ast::Binding::from));
                Ok(renderer.raw(&format!("? IN ({spots})"), bindings)?)
            }
            FilterKind::Like { column, pattern } => Ok(renderer.raw(
                "? LIKE ?",
                vec![column.build(renderer)?.into(), pattern.clone().into()],
            )?),
            FilterKind::IsNull { column, is_null } => {
                let text = if *is_null { "? IS NULL" } else { "? IS NOT NULL" };
                Ok(renderer.raw(text, vec![column.build(renderer)?.into()])?)
            }
            FilterKind::And(children) => join_children(renderer, children, " AND "),
            FilterKind::Or(children) => join_children(renderer, children, " OR "),
            FilterKind::Not(child) => {
                Ok(renderer.raw("NOT (?)", vec![child.build(renderer)?.into()])?)
            }
        }
    }
}

/// Nested AND/OR groups are parenthesized so precedence follows the tree.
fn join_children(
    renderer: &sql::Renderer,
    children: &mut [FilterCompiler],
    separator: &str,
) -> Result<sql::ast::Fragment, Error> {
    let fragments = children
        .iter_mut()
        .map(|child| -> Result<sql::ast::Fragment, Error> {
            let fragment = child.build(renderer)?;
            Ok(if child.is_logical() {
                sql::helpers::parenthesized(&fragment)
            } else {
                fragment
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(sql::helpers::join_fragments(&fragments, separator))
}
