//! Naive serialization: 8 little-endian bytes per value.

use crate::codec::FloatCodec;
use crate::error::{Result, TsbenchError};

const NAME: &str = "raw";

/// Width of one encoded value in bytes.
pub const VALUE_BYTES: usize = std::mem::size_of::<f64>();

/// Baseline codec that stores each value's bits as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl RawCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl FloatCodec for RawCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn encode(&self, values: &[f64]) -> Result<Vec<u8>> {
        Ok(to_le_bytes(values))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<f64>> {
        from_le_bytes(bytes).ok_or_else(|| {
            TsbenchError::codec(
                NAME,
                format!("{} bytes is not a multiple of {}", bytes.len(), VALUE_BYTES),
            )
        })
    }
}

/// Little-endian bytes of every value, in order.
pub(crate) fn to_le_bytes(values: &[f64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * VALUE_BYTES);
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Inverse of [`to_le_bytes`]; `None` if the length is not a whole number of values.
pub(crate) fn from_le_bytes(bytes: &[u8]) -> Option<Vec<f64>> {
    let chunks = bytes.chunks_exact(VALUE_BYTES);
    if !chunks.remainder().is_empty() {
        return None;
    }
    Some(
        chunks
            .map(|chunk| {
                let mut buf = [0u8; VALUE_BYTES];
                buf.copy_from_slice(chunk);
                f64::from_le_bytes(buf)
            })
            .collect(),
    )
}
