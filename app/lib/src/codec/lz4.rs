//! Byte shuffle + LZ4 block codec.
//!
//! The shuffle step transposes the eight bytes of every value into eight
//! byte planes (all first bytes, then all second bytes, ...). Sign and
//! exponent bytes of neighbouring values are usually alike, which gives the
//! LZ4 match finder long runs to work with.

use crate::codec::raw::{from_le_bytes, to_le_bytes, VALUE_BYTES};
use crate::codec::FloatCodec;
use crate::error::{Result, TsbenchError};

/// Upper bound of the LZ4 block decompression ratio.
const MAX_EXPANSION: usize = 255;

/// LZ4 block codec with optional byte shuffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lz4Codec {
    shuffle: bool,
}

impl Default for Lz4Codec {
    fn default() -> Self {
        Self::shuffled()
    }
}

impl Lz4Codec {
    /// Shuffle, then LZ4.
    pub fn shuffled() -> Self {
        Self { shuffle: true }
    }

    /// LZ4 on the raw little-endian bytes.
    pub fn plain() -> Self {
        Self { shuffle: false }
    }

    /// Whether the shuffle step is applied.
    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }
}

impl FloatCodec for Lz4Codec {
    fn name(&self) -> &'static str {
        if self.shuffle {
            "shuffle-lz4"
        } else {
            "lz4"
        }
    }

    fn encode(&self, values: &[f64]) -> Result<Vec<u8>> {
        let bytes = to_le_bytes(values);
        let input = if self.shuffle {
            shuffle(&bytes, VALUE_BYTES)
        } else {
            bytes
        };
        Ok(lz4_flex::block::compress_prepend_size(&input))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<f64>> {
        check_size_prefix(self.name(), bytes)?;
        let decompressed = lz4_flex::block::decompress_size_prepended(bytes)
            .map_err(|e| TsbenchError::codec(self.name(), e.to_string()))?;

        if decompressed.len() % VALUE_BYTES != 0 {
            return Err(TsbenchError::codec(
                self.name(),
                format!(
                    "decompressed {} bytes, not a multiple of {}",
                    decompressed.len(),
                    VALUE_BYTES
                ),
            ));
        }

        let raw = if self.shuffle {
            unshuffle(&decompressed, VALUE_BYTES)
        } else {
            decompressed
        };
        from_le_bytes(&raw).ok_or_else(|| TsbenchError::codec(self.name(), "partial value"))
    }
}

/// Reject a size prefix no block of this length could decompress to,
/// before anything is allocated for it.
fn check_size_prefix(codec: &'static str, bytes: &[u8]) -> Result<()> {
    let Some((prefix, block)) = bytes.split_first_chunk::<4>() else {
        return Err(TsbenchError::codec(codec, "missing size prefix"));
    };
    let claimed = u32::from_le_bytes(*prefix) as usize;
    let limit = block.len().saturating_mul(MAX_EXPANSION);
    if claimed > limit {
        return Err(TsbenchError::codec(
            codec,
            format!(
                "size prefix {} exceeds what {} block bytes can hold",
                claimed,
                block.len()
            ),
        ));
    }
    Ok(())
}

/// Transpose `bytes` made of `width`-byte elements into byte planes.
///
/// `bytes.len()` must be a multiple of `width`.
pub fn shuffle(bytes: &[u8], width: usize) -> Vec<u8> {
    let count = bytes.len() / width;
    let mut out = vec![0u8; bytes.len()];
    for (i, element) in bytes.chunks_exact(width).enumerate() {
        for (j, &b) in element.iter().enumerate() {
            out[j * count + i] = b;
        }
    }
    out
}

/// Inverse of [`shuffle`].
pub fn unshuffle(bytes: &[u8], width: usize) -> Vec<u8> {
    let count = bytes.len() / width;
    let mut out = vec![0u8; bytes.len()];
    for (j, plane) in bytes.chunks_exact(count.max(1)).take(width).enumerate() {
        for (i, &b) in plane.iter().enumerate() {
            out[i * width + j] = b;
        }
    }
    out
}
