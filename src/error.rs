// In: src/error.rs

//! This module defines the single, unified error type for the zstd-bytea library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every recoverable failure is surfaced to the host engine as a call-scoped
//! error through the `From<ZstdByteaError> for rusqlite::Error` conversion at the
//! bottom of this file. Only `ContextCreation` is meant to abort module load.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZstdByteaError {
    // =========================================================================
    // === Codec Errors (translated from the C-style error codes)
    // =========================================================================
    /// A compression or decompression routine reported an error code.
    #[error("{operation} failed: {name}")]
    Codec {
        operation: &'static str,
        name: &'static str,
    },

    #[error("ZSTD_getFrameContentSize returned unknown")]
    ContentSizeUnknown,

    #[error("ZSTD_getFrameContentSize failed")]
    ContentSizeError,

    #[error("ZSTD_getFrameContentSize returned value greater than i32::MAX: {0}")]
    LengthOverflow(u64),

    #[error("Decompressed size does not match frame header. Expected {expected}, got {actual}.")]
    SizeMismatch { expected: usize, actual: usize },

    // =========================================================================
    // === Binary Value Errors
    // =========================================================================
    #[error("Requested binary value of {requested} bytes exceeds the maximum of {max} bytes")]
    ValueTooLarge { requested: u64, max: usize },

    /// The allocator could not provide the output buffer.
    #[error("out of memory allocating {requested} bytes")]
    OutOfMemory { requested: usize },

    // =========================================================================
    // === Lifecycle & Host Errors
    // =========================================================================
    /// Fatal: the module cannot serve any call without its codec contexts.
    #[error("{0} failed")]
    ContextCreation(&'static str),

    #[error("Codec contexts are not initialized")]
    NotInitialized,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error from the Serde JSON library while reading the configuration.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error originating from the underlying I/O subsystem (config or log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// === Host Error Conversion ===
// =============================================================================

impl From<ZstdByteaError> for rusqlite::Error {
    fn from(err: ZstdByteaError) -> rusqlite::Error {
        rusqlite::Error::UserFunctionError(Box::new(err))
    }
}
