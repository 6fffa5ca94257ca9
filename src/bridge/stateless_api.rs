// In: src/bridge/stateless_api.rs

use crate::config::ExtensionConfig;
use crate::error::ZstdByteaError;
use crate::kernels::zstd as codec;
use crate::kernels::CodecContexts;
use crate::types::{BinaryValue, Bytea};

/// Compresses `data` into a new binary value holding one Zstandard frame.
///
/// A NULL `data` yields NULL regardless of the other arguments. A NULL `dict`
/// is the same as an empty one, and a NULL `level` falls back to
/// `config.default_level`.
pub fn compress<B: BinaryValue + ?Sized>(
    contexts: &mut CodecContexts,
    config: &ExtensionConfig,
    data: Option<&B>,
    dict: Option<&B>,
    level: Option<i32>,
) -> Result<Option<Bytea>, ZstdByteaError> {
    let Some(data) = data else {
        return Ok(None);
    };
    let input = data.payload();
    let dict = dict.map_or(&[][..], |d| d.payload());
    let level = level.unwrap_or(config.default_level);

    // 1. Size the output for the worst case, then shrink once the frame is written.
    let mut output = Bytea::with_payload_capacity(codec::compress_bound(input.len()))?;
    let written = contexts.compress_using_dict(output.payload_buffer_mut(), input, dict, level)?;
    output.truncate_payload(written);

    log::trace!(
        "compressed {} bytes to {} (level {level}, dict {} bytes)",
        input.len(),
        written,
        dict.len()
    );
    Ok(Some(output))
}

/// Decompresses a single-frame binary value, sizing the output from the frame header.
///
/// Frames that do not record their content size cannot be decompressed here,
/// because the output has to be allocated before the codec runs. The config
/// is accepted for symmetry with `compress`; no decompress setting exists yet.
pub fn decompress<B: BinaryValue + ?Sized>(
    contexts: &mut CodecContexts,
    _config: &ExtensionConfig,
    data: Option<&B>,
    dict: Option<&B>,
) -> Result<Option<Bytea>, ZstdByteaError> {
    let Some(data) = data else {
        return Ok(None);
    };
    let input = data.payload();
    let dict = dict.map_or(&[][..], |d| d.payload());

    let expected = codec::frame_content_size(input)?.ok_or(ZstdByteaError::ContentSizeUnknown)?;
    let capacity = usize::try_from(expected).map_err(|_| ZstdByteaError::ValueTooLarge {
        requested: expected,
        max: crate::types::MAX_PAYLOAD_SIZE,
    })?;

    let mut output = Bytea::with_payload_capacity(capacity)?;
    let written = contexts.decompress_using_dict(output.payload_buffer_mut(), input, dict)?;
    // libzstd already rejects a frame whose content disagrees with its header.
    if written != capacity {
        return Err(ZstdByteaError::SizeMismatch {
            expected: capacity,
            actual: written,
        });
    }
    output.truncate_payload(written);

    log::trace!("decompressed {} bytes to {written}", input.len());
    Ok(Some(output))
}

/// Reads the decompressed size recorded in the frame header.
///
/// Returns NULL for frames that do not record a size, and an error when the
/// size does not fit in a 32-bit signed integer.
pub fn length<B: BinaryValue + ?Sized>(data: Option<&B>) -> Result<Option<i32>, ZstdByteaError> {
    let Some(data) = data else {
        return Ok(None);
    };

    match codec::frame_content_size(data.payload())? {
        None => Ok(None),
        Some(size) => i32::try_from(size)
            .map(Some)
            .map_err(|_| ZstdByteaError::LengthOverflow(size)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_world_scenario() {
        let mut contexts = CodecContexts::create().unwrap();
        let config = ExtensionConfig::default();
        let input = Bytea::from_payload(b"hello world").unwrap();

        // 1. Act: compress with no dictionary and no level.
        let compressed = compress(&mut contexts, &config, Some(&input), None, None)
            .unwrap()
            .unwrap();

        // 2. Assert: the frame round-trips and reports its length.
        let restored = decompress(&mut contexts, &config, Some(&compressed), None)
            .unwrap()
            .unwrap();
        assert_eq!(restored.payload(), b"hello world");
        assert_eq!(length(Some(&compressed)).unwrap(), Some(11));
    }
}
