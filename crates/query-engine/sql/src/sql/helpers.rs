//! Helpers for building sql::ast types in certain shapes and patterns.

use super::ast::{Binding, Fragment, GroupBy, Limit, Select, SelectList, TableAlias};
use super::error::Error;

// Raw SQL //

/// Build a fragment from SQL text containing `?` placeholders. Each placeholder is replaced by
/// the next binding, in order. `\?` is a literal question mark.
pub fn raw(text: &str, bindings: Vec<Binding>) -> Result<Fragment, Error> {
    let placeholders = count_placeholders(text);
    if placeholders != bindings.len() {
        return Err(Error::BindingCountMismatch {
            text: text.to_string(),
            placeholders,
            bindings: bindings.len(),
        });
    }

    let mut fragment = Fragment::new();
    let mut bindings = bindings.into_iter();
    let mut syntax = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'?') => {
                chars.next();
                syntax.push('?');
            }
            '?' => {
                fragment.append_syntax(&syntax);
                syntax.clear();
                if let Some(binding) = bindings.next() {
                    fragment.append_binding(binding);
                }
            }
            c => syntax.push(c),
        }
    }
    fragment.append_syntax(&syntax);

    Ok(fragment)
}

fn count_placeholders(text: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in text.chars() {
        match c {
            '?' if !escaped => count += 1,
            _ => {}
        }
        escaped = c == '\\';
    }
    count
}

/// A fragment holding a single identifier.
pub fn identifier(name: &str) -> Fragment {
    let mut fragment = Fragment::new();
    fragment.append_identifier(name);
    fragment
}

/// Join fragments with `separator`.
pub fn join_fragments(fragments: &[Fragment], separator: &str) -> Fragment {
    let mut joined = Fragment::new();
    for (index, fragment) in fragments.iter().enumerate() {
        if index > 0 {
            joined.append_syntax(separator);
        }
        joined.append_fragment(fragment);
    }
    joined
}

/// Wrap a fragment in parentheses.
pub fn parenthesized(fragment: &Fragment) -> Fragment {
    let mut wrapped = Fragment::new();
    wrapped.append_syntax("(");
    wrapped.append_fragment(fragment);
    wrapped.append_syntax(")");
    wrapped
}

/// Create a table alias.
pub fn make_table_alias(name: String) -> TableAlias {
    TableAlias { name }
}

// Empty clauses //

/// An empty `GROUP BY` clause.
pub fn empty_group_by() -> GroupBy {
    GroupBy { elements: vec![] }
}

/// Empty `LIMIT` and `OFFSET` clauses.
pub fn empty_limit() -> Limit {
    Limit {
        limit: None,
        offset: None,
    }
}

// SELECTs //

/// Build a simple select with a select list and the rest are empty.
pub fn simple_select(items: Vec<Fragment>) -> Select {
    Select {
        select_list: SelectList {
            distinct: None,
            items,
        },
        from: None,
        joins: vec![],
        where_: None,
        group_by: empty_group_by(),
        having: None,
        order_by: None,
        limit: empty_limit(),
    }
}
