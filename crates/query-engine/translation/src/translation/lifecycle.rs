//! The build lifecycle shared by all compilers.

use query_engine_sql::sql;

use super::error::Error;

/// Where a compiler is in its lifecycle. A compiler is validated when it is constructed,
/// instantiates its children when it is prepared, and keeps its fragment once it is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle {
    Constructed,
    Prepared,
    Built(sql::ast::Fragment),
}

/// A compiler turns one node of the query description into a SQL fragment.
pub trait Compile {
    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Instantiate child compilers. Runs once, before the first `compile`.
    fn prepare(&mut self, _renderer: &sql::Renderer) -> Result<(), Error> {
        Ok(())
    }

    /// Produce the fragment. Only called through `build`.
    fn compile(&mut self, renderer: &sql::Renderer) -> Result<sql::ast::Fragment, Error>;

    /// Compile once and return the cached fragment on later calls.
    fn build(&mut self, renderer: &sql::Renderer) -> Result<sql::ast::Fragment, Error> {
        if let Lifecycle::Built(fragment) = self.lifecycle() {
            return Ok(fragment.clone());
        }
        if *self.lifecycle() == Lifecycle::Constructed {
            self.prepare(renderer)?;
            *self.lifecycle_mut() = Lifecycle::Prepared;
        }
        let fragment = self.compile(renderer)?;
        *self.lifecycle_mut() = Lifecycle::Built(fragment.clone());
        Ok(fragment)
    }
}
