//! SQL AST, fragments, and conversion to strings.

pub mod ast;
pub mod convert;
pub mod dialect;
pub mod error;
pub mod helpers;
pub mod renderer;
pub mod string;

pub use error::Error;
pub use renderer::Renderer;
