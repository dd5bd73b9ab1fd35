//! fast-fisher command-line library.
//!
//! Reads 2x2 tables from CSV, runs the batched Fisher exact test and writes
//! one result row per table.

pub mod args;
pub mod commands;
pub mod csv_parser;
pub mod csv_writer;
pub mod error;

pub use error::{CliError, Result};
