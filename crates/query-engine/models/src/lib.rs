//! The declarative query description accepted by the translator.

pub mod models;
