// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the host-agnostic API of the zstd-bytea library. It sits between
// whatever engine marshals the SQL arguments (see `ffi`) and the raw codec binding
// (`kernels::zstd`). It owns the whole binary value lifecycle: stripping the header,
// sizing the output, calling the codec and re-attaching a correct header.
//
// Data Flow (Compression):
//
//   1. [Host Binding (ffi::sqlite)]       -> Extracts `Option<&[u8]>` arguments
//         |
//         `-> locks the process-wide `CodecContexts` (lifecycle) ->
//
//   2. [Stateless API (compress)]         -> Allocates `compress_bound` + header
//         |
//         `-> a. Calls `ZSTD_compress_usingDict` into the payload region
//         |
//         `-> b. Shrinks the buffer to the frame size and rewrites the header
//
//   3. [Host Binding]                     -> Returns the `Bytea` payload as a BLOB
//
//
// Data Flow (Decompression / Length):
//
//   1. [Stateless API (decompress/length)] -> Reads the frame content size
//         |
//         `-> length: returns it (or NULL when unknown)
//         |
//         `-> decompress: allocates exactly that size and calls `ZSTD_decompress_usingDict`
//
// ====================================================================================
pub mod stateless_api;

pub use stateless_api::{compress, decompress, length};
