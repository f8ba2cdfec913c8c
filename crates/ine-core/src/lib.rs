//! Core types and trait definitions for the INE statistics pipeline.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! label parser, the SQLite store and the pipeline all depend on it.

pub mod dimension;
pub mod error;
pub mod fact;
pub mod period;
pub mod series;
pub mod source;
pub mod store;

pub use error::{Error, Result};
