//! Quantile compression through the `q_compress` crate.

use crate::codec::FloatCodec;
use crate::error::{Result, TsbenchError};

const NAME: &str = "q_compress";

/// Highest compression level `q_compress` accepts.
pub const MAX_Q_COMPRESS_LEVEL: usize = 12;

/// Quantile compression codec with a fixed compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QCompressCodec {
    level: usize,
}

impl Default for QCompressCodec {
    fn default() -> Self {
        Self {
            level: Self::DEFAULT_LEVEL,
        }
    }
}

impl QCompressCodec {
    /// Level used when none is given.
    pub const DEFAULT_LEVEL: usize = 8;

    /// Create the codec at the default level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the codec at `level`.
    ///
    /// # Panics
    ///
    /// Panics if `level` is above [`MAX_Q_COMPRESS_LEVEL`].
    pub fn with_level(level: usize) -> Self {
        assert!(
            level <= MAX_Q_COMPRESS_LEVEL,
            "q_compress level must be <= {}",
            MAX_Q_COMPRESS_LEVEL
        );
        Self { level }
    }

    /// The compression level.
    pub fn level(&self) -> usize {
        self.level
    }
}

impl FloatCodec for QCompressCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn encode(&self, values: &[f64]) -> Result<Vec<u8>> {
        Ok(q_compress::auto_compress(values, self.level))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<f64>> {
        q_compress::auto_decompress::<f64>(bytes)
            .map_err(|e| TsbenchError::codec(NAME, e.to_string()))
    }
}
