//! Zstandard stream compression of the raw little-endian bytes.

use crate::codec::raw::{from_le_bytes, to_le_bytes, VALUE_BYTES};
use crate::codec::FloatCodec;
use crate::error::{Result, TsbenchError};

const NAME: &str = "zstd";

/// Zstandard codec with a fixed compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZstdCodec {
    level: i32,
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self {
            level: Self::DEFAULT_LEVEL,
        }
    }
}

impl ZstdCodec {
    /// Level used when none is given.
    pub const DEFAULT_LEVEL: i32 = 3;

    /// Create the codec at the default level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the codec at `level`.
    ///
    /// Negative levels trade ratio for speed. The accepted range is
    /// [`zstd::compression_level_range`].
    pub fn with_level(level: i32) -> Self {
        Self { level }
    }

    /// The compression level.
    pub fn level(&self) -> i32 {
        self.level
    }
}

impl FloatCodec for ZstdCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn encode(&self, values: &[f64]) -> Result<Vec<u8>> {
        let bytes = to_le_bytes(values);
        zstd::stream::encode_all(bytes.as_slice(), self.level)
            .map_err(|e| TsbenchError::codec(NAME, e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<f64>> {
        let decompressed =
            zstd::stream::decode_all(bytes).map_err(|e| TsbenchError::codec(NAME, e.to_string()))?;
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
    fn test_roundtrip_levels() {
        let data: Vec<f64> = (0..4000).map(|i| 75.0 + (i / 20) as f64 * 0.125).collect();
        for level in [-10, 1, ZstdCodec::DEFAULT_LEVEL, 10] {
            let codec = ZstdCodec::with_level(level);
            let encoded = codec.encode(&data).unwrap();
            assert!(encoded.len() < data.len() * VALUE_BYTES, "level {}", level);
            assert_eq!(codec.decode(&encoded).unwrap(), data, "level {}", level);
        }
    }

    #[test]
    fn test_empty() {
        let codec = ZstdCodec::new();
        let encoded = codec.encode(&[]).unwrap();
        assert!(codec.decode(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_default_level() {
        assert_eq!(ZstdCodec::new().level(), 3);
        assert_eq!(ZstdCodec::new().name(), "zstd");
    }

    #[test]
    fn test_decode_garbage() {
        let result = ZstdCodec::new().decode(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(matches!(
            result,
            Err(TsbenchError::CodecError { codec: "zstd", .. })
        ));
    }
}
