//! Low-level SQL rendering: composable fragments, a SELECT statement AST, and dialect-aware
//! conversion to a parameterized SQL string.

pub mod sql;
