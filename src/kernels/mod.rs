//! Codec kernels. Currently a single Zstandard binding.

pub mod zstd;

pub use self::zstd::CodecContexts;
