//! This module defines the strongly-typed value representations shared by the
//! codec operations and the host binding.
//!
//! It currently includes `Bytea`, the length-prefixed binary value every
//! operation reads from and returns.

pub mod bytea;

// Re-export the main type(s) for easier access.
pub use bytea::{BinaryValue, Bytea, MAX_BYTEA_SIZE, MAX_PAYLOAD_SIZE, VARHDRSZ};
