// In: src/ffi/sqlite.rs

//! SQL surface of the extension.
//!
//! This layer only marshals arguments: it turns SQLite values into optional
//! payload slices, borrows the process-wide codec contexts and hands both to
//! the bridge. Every `ZstdByteaError` becomes a `UserFunctionError`, which
//! fails the statement but leaves the connection usable.

use std::ops::RangeInclusive;
use std::sync::Arc;

use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::bridge;
use crate::config::ExtensionConfig;
use crate::error::ZstdByteaError;
use crate::kernels::zstd as codec;
use crate::lifecycle;

//==================================================================================
// I. Registration
//==================================================================================

/// Registers the functions under their default names (`zstd_compress`, ...).
///
/// This is also the init hook: the codec contexts are created here if they do
/// not exist yet, and a failure aborts registration.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    register_functions_with_config(conn, Arc::new(ExtensionConfig::default()))
}

pub fn register_functions_with_config(
    conn: &Connection,
    config: Arc<ExtensionConfig>,
) -> rusqlite::Result<()> {
    config.validate()?;
    lifecycle::initialize()?;

    let deterministic = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    // <prefix>compress(data [, dict [, level]])
    let name = config.function_name("compress");
    let cfg = Arc::clone(&config);
    conn.create_scalar_function(name.as_str(), -1, deterministic, move |ctx| {
        check_arity(ctx, "compress", 1..=3)?;
        let data = binary_arg(ctx, 0, "compress")?;
        let dict = binary_arg(ctx, 1, "compress")?;
        let level = level_arg(ctx, 2)?;
        let result = lifecycle::with_contexts(|contexts| {
            bridge::compress(contexts, &cfg, data, dict, level)
        })?;
        Ok(result)
    })?;

    // <prefix>decompress(data [, dict])
    let name = config.function_name("decompress");
    let cfg = Arc::clone(&config);
    conn.create_scalar_function(name.as_str(), -1, deterministic, move |ctx| {
        check_arity(ctx, "decompress", 1..=2)?;
        let data = binary_arg(ctx, 0, "decompress")?;
        let dict = binary_arg(ctx, 1, "decompress")?;
        let result = lifecycle::with_contexts(|contexts| {
            bridge::decompress(contexts, &cfg, data, dict)
        })?;
        Ok(result)
    })?;

    // <prefix>length(data)
    let name = config.function_name("length");
    conn.create_scalar_function(name.as_str(), 1, deterministic, |ctx| {
        let data = binary_arg(ctx, 0, "length")?;
        Ok(bridge::length(data)?)
    })?;

    // <prefix>version()
    let name = config.function_name("version");
    conn.create_scalar_function(name.as_str(), 0, FunctionFlags::SQLITE_UTF8, |_ctx| {
        Ok(format!(
            "zstd-bytea {} (libzstd {})",
            crate::VERSION,
            codec::library_version()
        ))
    })?;

    log::debug!(
        "registered zstd-bytea functions with prefix '{}'",
        config.function_prefix
    );
    Ok(())
}

//==================================================================================
// II. Argument Marshalling
//==================================================================================

fn check_arity(
    ctx: &Context<'_>,
    function: &str,
    allowed: RangeInclusive<usize>,
) -> Result<(), ZstdByteaError> {
    if allowed.contains(&ctx.len()) {
        return Ok(());
    }
    Err(ZstdByteaError::InvalidArgument(format!(
        "{function} takes {} to {} arguments, got {}",
        allowed.start(),
        allowed.end(),
        ctx.len()
    )))
}

/// A BLOB (or TEXT, as its UTF-8 bytes) argument. Missing and NULL are both `None`.
fn binary_arg<'a>(
    ctx: &'a Context<'_>,
    idx: usize,
    function: &str,
) -> Result<Option<&'a [u8]>, ZstdByteaError> {
    if idx >= ctx.len() {
        return Ok(None);
    }
    match ctx.get_raw(idx) {
        ValueRef::Null => Ok(None),
        ValueRef::Blob(bytes) | ValueRef::Text(bytes) => Ok(Some(bytes)),
        other => Err(ZstdByteaError::InvalidArgument(format!(
            "{function}: argument {} must be BLOB, got {}",
            idx + 1,
            other.data_type()
        ))),
    }
}

/// An INTEGER compression level that must fit in an `i32`. Missing and NULL are both `None`.
fn level_arg(ctx: &Context<'_>, idx: usize) -> Result<Option<i32>, ZstdByteaError> {
    if idx >= ctx.len() {
        return Ok(None);
    }
    match ctx.get_raw(idx) {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(level) => i32::try_from(level).map(Some).map_err(|_| {
            ZstdByteaError::InvalidArgument(format!(
                "compress: level {level} is out of range for a 32-bit integer"
            ))
        }),
        other => Err(ZstdByteaError::InvalidArgument(format!(
            "compress: level must be INTEGER, got {}",
            other.data_type()
        ))),
    }
}

//==================================================================================
// III. SQLite Loadable Extension Entry Point
//==================================================================================

/// Entry point for `SELECT load_extension('libzstd_bytea')`.
///
/// Reads the optional config named by `ZSTD_BYTEA_CONFIG`, installs logging,
/// creates the codec contexts and registers the functions. Any failure makes
/// SQLite refuse to load the extension.
///
/// # Safety
/// Called by SQLite with a valid connection handle and API routine table.
#[cfg(feature = "loadable_extension")]
#[no_mangle]
pub unsafe extern "C" fn sqlite3_extension_init(
    db: *mut rusqlite::ffi::sqlite3,
    _pz_err_msg: *mut *mut std::os::raw::c_char,
    p_api: *mut rusqlite::ffi::sqlite3_api_routines,
) -> std::os::raw::c_int {
    use rusqlite::ffi;

    if ffi::rusqlite_extension_init2(p_api).is_err() {
        return ffi::SQLITE_ERROR;
    }

    match load_extension(db) {
        Ok(()) => ffi::SQLITE_OK,
        Err(err) => {
            log::error!("zstd-bytea failed to load: {err}");
            ffi::SQLITE_ERROR
        }
    }
}

#[cfg(feature = "loadable_extension")]
unsafe fn load_extension(
    db: *mut rusqlite::ffi::sqlite3,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ExtensionConfig::from_env()?;
    crate::logging::enable_logging(
        config.log_level_filter()?,
        config.log_file.as_deref().map(std::path::Path::new),
    )?;

    let conn = Connection::from_handle(db)?;
    register_functions_with_config(&conn, Arc::new(config))?;
    // SQLite owns the handle.
    std::mem::forget(conn);
    Ok(())
}
