//! Float codecs under benchmark.
//!
//! Every codec implements [`FloatCodec`]: `encode` turns a slice of values
//! into an opaque byte blob and `decode` turns it back. Decoding must give
//! back exactly the encoded values, bit for bit.

pub mod bits;
mod gorilla;
mod lz4;
mod quantile;
mod raw;
mod snappy;
mod tsz_stream;
mod zstandard;

pub use gorilla::GorillaCodec;
pub use lz4::{shuffle, unshuffle, Lz4Codec};
pub use quantile::{QCompressCodec, MAX_Q_COMPRESS_LEVEL};
pub use raw::RawCodec;
pub use snappy::SnapCodec;
pub use tsz_stream::TszCodec;
pub use zstandard::ZstdCodec;

use std::fmt;
use std::str::FromStr;

use crate::config::BenchConfig;
use crate::error::{Result, TsbenchError};

/// A float compression scheme.
pub trait FloatCodec: Send + Sync {
    /// Short name used in reports and result file names.
    fn name(&self) -> &'static str;

    /// Encode values into an opaque blob.
    fn encode(&self, values: &[f64]) -> Result<Vec<u8>>;

    /// Decode a blob produced by [`encode`](Self::encode).
    fn decode(&self, bytes: &[u8]) -> Result<Vec<f64>>;
}

/// The codecs this crate ships, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    /// 8 little-endian bytes per value.
    Raw,
    /// XOR delta encoding.
    Gorilla,
    /// LZ4 on the raw bytes.
    Lz4,
    /// Byte shuffle, then LZ4.
    ShuffleLz4,
    /// Zstandard on the raw bytes.
    Zstd,
    /// Snappy frames on the raw bytes.
    Snap,
    /// Gorilla through the `tsz` crate.
    Tsz,
    /// Quantile compression.
    QCompress,
}

impl CodecKind {
    /// All codecs, baseline first.
    pub const ALL: [CodecKind; 8] = [
        CodecKind::Raw,
        CodecKind::Gorilla,
        CodecKind::Lz4,
        CodecKind::ShuffleLz4,
        CodecKind::Zstd,
        CodecKind::Snap,
        CodecKind::Tsz,
        CodecKind::QCompress,
    ];

    /// The codec's name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CodecKind::Raw => "raw",
            CodecKind::Gorilla => "gorilla",
            CodecKind::Lz4 => "lz4",
            CodecKind::ShuffleLz4 => "shuffle-lz4",
            CodecKind::Zstd => "zstd",
            CodecKind::Snap => "snap",
            CodecKind::Tsz => "tsz",
            CodecKind::QCompress => "q_compress",
        }
    }

    /// Build the codec with default levels.
    pub fn build(&self) -> Box<dyn FloatCodec> {
        self.build_with(&BenchConfig::default())
    }

    /// Build the codec, taking compression levels from `config`.
    pub fn build_with(&self, config: &BenchConfig) -> Box<dyn FloatCodec> {
        match self {
            CodecKind::Raw => Box::new(RawCodec::new()),
            CodecKind::Gorilla => Box::new(GorillaCodec::new()),
            CodecKind::Lz4 => Box::new(Lz4Codec::plain()),
            CodecKind::ShuffleLz4 => Box::new(Lz4Codec::shuffled()),
            CodecKind::Zstd => Box::new(ZstdCodec::with_level(config.zstd_level)),
            CodecKind::Snap => Box::new(SnapCodec::new()),
            CodecKind::Tsz => Box::new(TszCodec::new()),
            CodecKind::QCompress => Box::new(QCompressCodec::with_level(
                config.q_compress_level.min(MAX_Q_COMPRESS_LEVEL),
            )),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodecKind {
    type Err = TsbenchError;

    fn from_str(s: &str) -> Result<Self> {
        CodecKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                TsbenchError::InvalidConfig(format!(
                    "unknown codec {:?} (expected one of {})",
                    s,
                    CodecKind::ALL.map(|kind| kind.as_str()).join(", ")
                ))
            })
    }
}
