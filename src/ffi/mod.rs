//! Host engine bindings. The SQLite binding is the only one for now.

pub mod sqlite;

pub use sqlite::{register_functions, register_functions_with_config};

#[cfg(test)]
mod sqlite_tests;
