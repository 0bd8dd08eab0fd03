//! The rendering entry point used by query translation.

use super::ast::{Binding, Fragment, Limit, Select};
use super::dialect::Dialect;
use super::error::Error;
use super::helpers;
use super::string::{Param, SQL};

/// Composes fragments and renders them for one dialect.
///
/// Translation only ever produces SQL through this type: raw text with `?` placeholders plus
/// bindings, quoted identifiers, and SELECT statements. Quoting and placeholder syntax are
/// applied when [`Renderer::to_sql`] is called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Renderer {
    dialect: Dialect,
}

impl Renderer {
    pub fn new(dialect: Dialect) -> Renderer {
        Renderer { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// See [`helpers::raw`].
    pub fn raw(&self, text: &str, bindings: Vec<Binding>) -> Result<Fragment, Error> {
        helpers::raw(text, bindings)
    }

    pub fn identifier(&self, name: &str) -> Fragment {
        helpers::identifier(name)
    }

    /// A single placeholder bound to `param`.
    pub fn value(&self, param: Param) -> Fragment {
        let mut fragment = Fragment::new();
        fragment.append_param(param);
        fragment
    }

    /// An empty SELECT to attach clauses to.
    pub fn select(&self) -> Select {
        helpers::simple_select(vec![])
    }

    /// LIMIT and OFFSET for this dialect. An OFFSET without a LIMIT gets the dialect's
    /// unbounded LIMIT where one is required.
    pub fn limit(&self, limit: Option<u64>, offset: Option<u64>) -> Limit {
        let limit = match (limit, offset) {
            (None, Some(_)) => self.dialect.unbounded_limit(),
            (limit, _) => limit,
        };
        Limit { limit, offset }
    }

    /// Turn a statement into a fragment that can be rendered or nested in another statement.
    pub fn statement(&self, select: &Select) -> Fragment {
        let mut fragment = Fragment::new();
        select.to_sql(&mut fragment);
        fragment
    }

    pub fn to_sql(&self, fragment: &Fragment) -> SQL {
        SQL::from_fragment(fragment, self.dialect)
    }
}
