//! Translate the order by clause.

use query_engine_models::models;
use query_engine_sql::sql;

use super::fields::ColumnCompiler;
use crate::translation::error::{Error, ValidationError};
use crate::translation::lifecycle::{Compile, Lifecycle};

/// Compiles the elements of an ORDER BY clause, joined by commas.
#[derive(Debug)]
pub struct OrderByCompiler {
    elements: Vec<(ColumnCompiler, sql::ast::OrderByDirection)>,
    lifecycle: Lifecycle,
}

impl OrderByCompiler {
    pub fn new(elements: &[models::OrderByElement]) -> Result<OrderByCompiler, Error> {
        if elements.is_empty() {
            return Err(ValidationError::EmptyList("order_by").into());
        }
        let elements = elements
            .iter()
            .map(|element| -> Result<_, Error> {
                Ok((
                    ColumnCompiler::nested(element.column.clone().into_column())?,
                    translate_direction(element.direction.as_deref())?,
                ))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(OrderByCompiler {
            elements,
            lifecycle: Lifecycle::Constructed,
        })
    }
}

fn translate_direction(direction: Option<&str>) -> Result<sql::ast::OrderByDirection, Error> {
    match direction {
        None => Ok(sql::ast::OrderByDirection::Asc),
        Some(direction) if direction.eq_ignore_ascii_case("asc") => {
            Ok(sql::ast::OrderByDirection::Asc)
        }
        Some(direction) if direction.eq_ignore_ascii_case("desc") => {
            Ok(sql::ast::OrderByDirection::Desc)
        }
        Some(direction) => {
            Err(ValidationError::InvalidOrderDirection(direction.to_string()).into())
        }
    }
}

impl Compile for OrderByCompiler {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn compile(&mut self, renderer: &sql::Renderer) -> Result<sql::ast::Fragment, Error> {
        let elements = self
            .elements
            .iter_mut()
            .map(|(column, direction)| -> Result<_, Error> {
                let mut element = column.build(renderer)?;
                direction.to_sql(&mut element);
                Ok(element)
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(sql::helpers::join_fragments(&elements, ", "))
    }
}
