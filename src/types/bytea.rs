//! The length-prefixed binary value (`Bytea`) handed between the host engine
//! and the codec operations.
//!
//! Layout: a fixed 4-byte header holding the *total* size (header + payload) as
//! a little-endian `u32`, immediately followed by the payload bytes. The header
//! is never part of the logical length.

use crate::error::ZstdByteaError;

//==================================================================================
// 1. Constants
//==================================================================================

/// Size of the length header that precedes every payload.
pub const VARHDRSZ: usize = 4;

/// Largest total size (header included) a single binary value may have.
/// Matches the host allocator's hard limit of 1 GiB - 1.
pub const MAX_BYTEA_SIZE: usize = 0x3FFF_FFFF;

/// Largest payload that fits inside `MAX_BYTEA_SIZE`.
pub const MAX_PAYLOAD_SIZE: usize = MAX_BYTEA_SIZE - VARHDRSZ;

//==================================================================================
// 2. Payload Access
//==================================================================================

/// Anything the operations can read payload bytes from.
///
/// Implemented for `Bytea` (header stripped) and for plain byte slices, which is
/// how hosts without a length-prefixed representation hand over their blobs.
pub trait BinaryValue {
    fn payload(&self) -> &[u8];
}

impl BinaryValue for [u8] {
    fn payload(&self) -> &[u8] {
        self
    }
}

//==================================================================================
// 3. The Binary Value
//==================================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct Bytea {
    raw: Vec<u8>,
}

impl Bytea {
    /// Copies `payload` into a new binary value.
    pub fn from_payload(payload: &[u8]) -> Result<Self, ZstdByteaError> {
        check_payload_size(payload.len() as u64)?;
        let mut raw = Vec::with_capacity(VARHDRSZ + payload.len());
        raw.extend_from_slice(&header_for(payload.len()));
        raw.extend_from_slice(payload);
        Ok(Self { raw })
    }

    /// Allocates a zeroed value whose payload can hold `capacity` bytes.
    /// The header is set for the full capacity until `truncate_payload` is called.
    pub(crate) fn with_payload_capacity(capacity: usize) -> Result<Self, ZstdByteaError> {
        check_payload_size(capacity as u64)?;
        let mut raw = try_alloc_zeroed(VARHDRSZ + capacity)?;
        raw[..VARHDRSZ].copy_from_slice(&header_for(capacity));
        Ok(Self { raw })
    }

    /// The writable payload region, for the codec to fill.
    pub(crate) fn payload_buffer_mut(&mut self) -> &mut [u8] {
        &mut self.raw[VARHDRSZ..]
    }

    /// Cuts the payload down to `len` bytes, releases the spare allocation and
    /// rewrites the header.
    pub(crate) fn truncate_payload(&mut self, len: usize) {
        debug_assert!(len <= self.len());
        self.raw.truncate(VARHDRSZ + len);
        self.raw.shrink_to_fit();
        let header = header_for(len);
        self.raw[..VARHDRSZ].copy_from_slice(&header);
    }

    pub fn payload(&self) -> &[u8] {
        &self.raw[VARHDRSZ..]
    }

    /// Logical length (payload only).
    pub fn len(&self) -> usize {
        self.raw.len() - VARHDRSZ
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size as recorded in the header, header included.
    pub fn total_size(&self) -> usize {
        read_header(&self.raw)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.raw
    }
}

impl BinaryValue for Bytea {
    fn payload(&self) -> &[u8] {
        Bytea::payload(self)
    }
}

impl std::fmt::Debug for Bytea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bytea")
            .field("total_size", &self.total_size())
            .field("len", &self.len())
            .finish()
    }
}

/// Hands the payload to SQLite without copying; SQLite takes its own copy.
impl rusqlite::types::ToSql for Bytea {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(rusqlite::types::ToSqlOutput::Borrowed(
            rusqlite::types::ValueRef::Blob(self.payload()),
        ))
    }
}

//==================================================================================
// 4. Header Helpers
//==================================================================================

fn check_payload_size(len: u64) -> Result<(), ZstdByteaError> {
    if len > MAX_PAYLOAD_SIZE as u64 {
        return Err(ZstdByteaError::ValueTooLarge {
            requested: len,
            max: MAX_PAYLOAD_SIZE,
        });
    }
    Ok(())
}

/// A zeroed buffer of `len` bytes. Allocation failure is an error, not an abort.
fn try_alloc_zeroed(len: usize) -> Result<Vec<u8>, ZstdByteaError> {
    let mut raw = Vec::new();
    raw.try_reserve_exact(len)
        .map_err(|_| ZstdByteaError::OutOfMemory { requested: len })?;
    raw.resize(len, 0);
    Ok(raw)
}

/// Caller guarantees `payload_len <= MAX_PAYLOAD_SIZE`, so the total fits in a u32.
fn header_for(payload_len: usize) -> [u8; VARHDRSZ] {
    ((payload_len + VARHDRSZ) as u32).to_le_bytes()
}

fn read_header(raw: &[u8]) -> usize {
    let mut header = [0u8; VARHDRSZ];
    header.copy_from_slice(&raw[..VARHDRSZ]);
    u32::from_le_bytes(header) as usize
}
