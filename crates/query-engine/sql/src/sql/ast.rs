//! Type definitions of a SQL AST representation.

use super::string::Param;

/// A piece of SQL made of raw syntax, identifiers, and parameters.
/// Identifiers are quoted and parameters replaced by placeholders only when the
/// fragment is rendered, so fragments can be nested freely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub parts: Vec<Part>,
}

/// A single element of a fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// SQL text emitted verbatim
    Syntax(String),
    /// A possibly qualified identifier, e.g. `albums.title`
    Identifier(String),
    /// A column or table alias, always quoted as a single name
    Alias(String),
    /// A value bound to a placeholder
    Param(Param),
}

/// What to substitute for a `?` in raw SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Bind a value, keeping the placeholder
    Param(Param),
    /// Insert a quoted identifier
    Identifier(String),
    /// Insert a quoted alias
    Alias(String),
    /// Splice in another fragment, together with its parameters
    Fragment(Fragment),
}

/// A SELECT clause
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub select_list: SelectList,
    pub from: Option<From>,
    /// Compiled JOIN clauses, in the order they are attached
    pub joins: Vec<Fragment>,
    pub where_: Option<Where>,
    pub group_by: GroupBy,
    pub having: Option<Having>,
    pub order_by: Option<OrderBy>,
    pub limit: Limit,
}

/// A select list, optionally led by a `DISTINCT` or `DISTINCT ON` fragment
#[derive(Debug, Clone, PartialEq)]
pub struct SelectList {
    pub distinct: Option<Fragment>,
    pub items: Vec<Fragment>,
}

/// A table or a derived table, as used by FROM and JOIN
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    /// A table referenced by name
    Table {
        name: String,
        alias: Option<TableAlias>,
    },
    /// A parenthesized, already built subquery
    Subquery {
        query: Fragment,
        alias: Option<TableAlias>,
    },
}

/// A FROM clause
#[derive(Debug, Clone, PartialEq)]
pub struct From(pub TableSource);

/// A JOIN clause
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub source: TableSource,
    pub on: Option<Fragment>,
}

/// The kind of a JOIN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
    Cross,
}

/// A WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct Where(pub Fragment);

/// A GROUP BY clause
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    pub elements: Vec<Fragment>,
}

/// A HAVING clause
#[derive(Debug, Clone, PartialEq)]
pub struct Having(pub Fragment);

/// An ORDER BY clause, with its elements already joined
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy(pub Fragment);

/// A direction for a single ORDER BY element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderByDirection {
    Asc,
    Desc,
}

/// LIMIT and OFFSET clauses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limit {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// aliases that we give to relations
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableAlias {
    pub name: String,
}

impl Fragment {
    pub fn new() -> Fragment {
        Fragment { parts: vec![] }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Adjacent syntax is merged so fragments stay small.
    pub fn append_syntax(&mut self, sql: &str) {
        if sql.is_empty() {
            return;
        }
        match self.parts.last_mut() {
            Some(Part::Syntax(text)) => text.push_str(sql),
            _ => self.parts.push(Part::Syntax(sql.to_string())),
        }
    }

    pub fn append_identifier(&mut self, name: &str) {
        self.parts.push(Part::Identifier(name.to_string()));
    }

    pub fn append_alias(&mut self, name: &str) {
        self.parts.push(Part::Alias(name.to_string()));
    }

    pub fn append_param(&mut self, param: Param) {
        self.parts.push(Part::Param(param));
    }

    pub fn append_fragment(&mut self, other: &Fragment) {
        for part in &other.parts {
            match part {
                Part::Syntax(text) => self.append_syntax(text),
                other => self.parts.push(other.clone()),
            }
        }
    }

    pub fn append_binding(&mut self, binding: Binding) {
        match binding {
            Binding::Param(param) => self.append_param(param),
            Binding::Identifier(name) => self.append_identifier(&name),
            Binding::Alias(name) => self.append_alias(&name),
            Binding::Fragment(fragment) => self.append_fragment(&fragment),
        }
    }

    /// The parameters of this fragment, in placeholder order.
    pub fn params(&self) -> impl Iterator<Item = &Param> {
        self.parts.iter().filter_map(|part| match part {
            Part::Param(param) => Some(param),
            _ => None,
        })
    }

    pub fn placeholder_count(&self) -> usize {
        self.params().count()
    }
}

impl std::convert::From<Param> for Binding {
    fn from(value: Param) -> Self {
        Binding::Param(value)
    }
}

impl std::convert::From<Fragment> for Binding {
    fn from(value: Fragment) -> Self {
        Binding::Fragment(value)
    }
}
