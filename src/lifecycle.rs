//! Process lifecycle of the codec contexts.
//!
//! One `CodecContexts` pair exists per process, created by `initialize()` when
//! the extension is loaded and released by `shutdown()` at unload. The pair is
//! kept behind a `Mutex` because the zstd contexts must not be used from two
//! threads at once; every call holds the lock for exactly one codec operation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::ZstdByteaError;
use crate::kernels::CodecContexts;

/// A lockable slot for one `CodecContexts` pair.
pub struct ContextRegistry {
    slot: Mutex<Option<CodecContexts>>,
}

impl ContextRegistry {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Creates the contexts unless they already exist.
    pub fn initialize(&self) -> Result<(), ZstdByteaError> {
        let mut slot = self.lock();
        if slot.is_none() {
            *slot = Some(CodecContexts::create()?);
            log::info!("zstd codec contexts created");
        }
        Ok(())
    }

    /// Drops the contexts if present. Safe to call any number of times.
    pub fn shutdown(&self) {
        if self.lock().take().is_some() {
            log::info!("zstd codec contexts released");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().is_some()
    }

    /// Lends the contexts to `f` for the duration of one operation.
    pub fn with_contexts<R>(
        &self,
        f: impl FnOnce(&mut CodecContexts) -> Result<R, ZstdByteaError>,
    ) -> Result<R, ZstdByteaError> {
        let mut slot = self.lock();
        let contexts = slot.as_mut().ok_or(ZstdByteaError::NotInitialized)?;
        f(contexts)
    }

    // A panic inside another call cannot leave a zstd context unusable: every
    // one-shot call resets its session first.
    fn lock(&self) -> MutexGuard<'_, Option<CodecContexts>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================
// Process-wide registry
//==================================================================================

static GLOBAL: ContextRegistry = ContextRegistry::new();

/// Module load hook. A failure here must abort loading the extension.
pub fn initialize() -> Result<(), ZstdByteaError> {
    GLOBAL.initialize()
}

/// Module unload hook.
pub fn shutdown() {
    GLOBAL.shutdown()
}

pub fn is_initialized() -> bool {
    GLOBAL.is_initialized()
}

pub fn with_contexts<R>(
    f: impl FnOnce(&mut CodecContexts) -> Result<R, ZstdByteaError>,
) -> Result<R, ZstdByteaError> {
    GLOBAL.with_contexts(f)
}
