//! Snappy framed compression of the raw little-endian bytes.

use std::io::{Read, Write};

use crate::codec::raw::{from_le_bytes, to_le_bytes, VALUE_BYTES};
use crate::codec::FloatCodec;
use crate::error::{Result, TsbenchError};

const NAME: &str = "snap";

/// Snappy codec using the framing format.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapCodec;

impl SnapCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl FloatCodec for SnapCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn encode(&self, values: &[f64]) -> Result<Vec<u8>> {
        let bytes = to_le_bytes(values);
        let mut encoder = snap::write::FrameEncoder::new(Vec::new());
        encoder
            .write_all(&bytes)
            .map_err(|e| TsbenchError::codec(NAME, e.to_string()))?;
        encoder
            .into_inner()
            .map_err(|e| TsbenchError::codec(NAME, e.error().to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<f64>> {
        let mut decompressed = Vec::new();
        snap::read::FrameDecoder::new(bytes)
            .read_to_end(&mut decompressed)
            .map_err(|e| TsbenchError::codec(NAME, e.to_string()))?;
        from_le_bytes(&decompressed).ok_or_else(|| {
            TsbenchError::codec(
                NAME,
                format!(
                    "decompressed {} bytes, not a multiple of {}",
                    decompressed.len(),
                    VALUE_BYTES
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let data: Vec<f64> = (0..8191).map(|i| 1000.0 + (i % 64) as f64).collect();
        let codec = SnapCodec::new();
        let encoded = codec.encode(&data).unwrap();
        assert!(encoded.len() < data.len() * VALUE_BYTES);
        assert_eq!(codec.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_empty() {
        let codec = SnapCodec::new();
        let encoded = codec.encode(&[]).unwrap();
        assert!(codec.decode(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_decode_garbage() {
        let result = SnapCodec::new().decode(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(matches!(
            result,
            Err(TsbenchError::CodecError { codec: "snap", .. })
        ));
    }
}
