//! This module contains the thin, panic-free binding to the Zstandard library
//! used by the bytea operations.
//!
//! It exposes exactly the four codec primitives the operations rely on
//! (bound estimate, compress with dictionary, decompress with dictionary and
//! frame content size lookup) plus the `CodecContexts` pair that owns the
//! reusable encode/decode state. Every C-style error code is translated into
//! a `ZstdByteaError` here, so no caller ever sees a raw `size_t` error.

use zstd::zstd_safe::{self, CCtx, DCtx};

use crate::error::ZstdByteaError;

//==================================================================================
// 1. Context Ownership
//==================================================================================

/// The process-wide encode/decode contexts.
///
/// Both handles are freed independently when the struct (or a partially built
/// one) is dropped. `CCtx`/`DCtx` are `Send` but not `Sync`: callers must hold
/// exclusive access for the duration of a codec call.
pub struct CodecContexts {
    cctx: CCtx<'static>,
    dctx: DCtx<'static>,
}

impl CodecContexts {
    /// Creates one compression and one decompression context.
    pub fn create() -> Result<Self, ZstdByteaError> {
        let cctx = CCtx::try_create().ok_or(ZstdByteaError::ContextCreation("ZSTD_createCCtx"))?;
        let dctx = DCtx::try_create().ok_or(ZstdByteaError::ContextCreation("ZSTD_createDCtx"))?;
        Ok(Self { cctx, dctx })
    }

    /// Compresses `src` into `dst` as a single frame, returning the number of bytes written.
    ///
    /// An empty `dict` is the same as no dictionary.
    pub fn compress_using_dict(
        &mut self,
        dst: &mut [u8],
        src: &[u8],
        dict: &[u8],
        level: i32,
    ) -> Result<usize, ZstdByteaError> {
        self.cctx
            .compress_using_dict(dst, src, dict, level)
            .map_err(|code| codec_error("ZSTD_compress_usingDict", code))
    }

    /// Decompresses every frame in `src` into `dst`, returning the number of bytes written.
    pub fn decompress_using_dict(
        &mut self,
        dst: &mut [u8],
        src: &[u8],
        dict: &[u8],
    ) -> Result<usize, ZstdByteaError> {
        self.dctx
            .decompress_using_dict(dst, src, dict)
            .map_err(|code| codec_error("ZSTD_decompress_usingDict", code))
    }
}

impl std::fmt::Debug for CodecContexts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CodecContexts { .. }")
    }
}

//==================================================================================
// 2. Stateless Primitives
//==================================================================================

/// Worst-case compressed size for an input of `len` bytes. Never zero for
/// representable inputs, even when `len` is zero.
pub fn compress_bound(len: usize) -> usize {
    zstd_safe::compress_bound(len)
}

/// Reads the decompressed size from the frame header without decompressing.
///
/// Returns `Ok(None)` when the frame does not record its size (streaming mode),
/// and `ContentSizeError` when the header cannot be parsed.
pub fn frame_content_size(src: &[u8]) -> Result<Option<u64>, ZstdByteaError> {
    zstd_safe::get_frame_content_size(src).map_err(|_| ZstdByteaError::ContentSizeError)
}

/// Version of the linked libzstd, e.g. `1.5.6`.
pub fn library_version() -> &'static str {
    zstd_safe::version_string()
}

/// Inclusive range of compression levels accepted by the linked libzstd.
pub fn level_range() -> std::ops::RangeInclusive<i32> {
    zstd_safe::min_c_level()..=zstd_safe::max_c_level()
}

fn codec_error(operation: &'static str, code: zstd_safe::ErrorCode) -> ZstdByteaError {
    let name = zstd_safe::get_error_name(code);
    log::debug!("{operation} returned error code {code}: {name}");
    ZstdByteaError::Codec { operation, name }
}

//==================================================================================
// 3. Test Fixtures
//==================================================================================


//==================================================================================
// 4. Unit Tests
//==================================================================================
