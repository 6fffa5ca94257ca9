//! This file is the root of the `zstd_bytea` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`bridge`, `kernels`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of items a host needs: the registration entry
//!     points, the configuration, the error type and the binary value type.
//!
//! When built with the `loadable_extension` feature the cdylib also exports
//! `sqlite3_extension_init`, see `ffi::sqlite`.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod config;
pub mod error;
pub mod ffi;
pub mod kernels;
pub mod lifecycle;
pub mod logging;
pub mod types;

//==================================================================================
// 2. Public Surface
//==================================================================================
pub use config::ExtensionConfig;
pub use error::ZstdByteaError;
pub use ffi::{register_functions, register_functions_with_config};
pub use kernels::CodecContexts;
pub use lifecycle::{initialize, shutdown};
pub use types::{BinaryValue, Bytea};
