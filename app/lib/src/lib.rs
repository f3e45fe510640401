//! # tsbench
//!
//! Float extraction from delimited time-series files, and a benchmark
//! harness for float compression codecs.
//!
//! ## Features
//!
//! - **Float extraction**: pulls every numeric token out of comma-separated
//!   text, stripping quotes and silently dropping tokens that are not numbers
//!   (and NaN values, unless asked to keep them)
//! - **Float text files**: one value per line, written losslessly
//! - **Codecs**: raw little-endian bytes, Gorilla-style XOR delta encoding
//!   (in-crate and through `tsz`), LZ4 with or without a byte shuffle,
//!   Zstandard, Snappy and quantile compression, all behind [`FloatCodec`]
//! - **Benchmarking**: paged encode/decode timing with round-trip
//!   verification and compression ratio reports
//!
//! ## Quick Start
//!
//! ### Extraction
//!
//! ```rust
//! use tsbench::{ExtractorConfig, FloatExtractor};
//!
//! let csv = "\"Date\",\"Close\"\n\"2021-03-01\",\"120.5\"\n\"2021-03-02\",\"n/a\"";
//! let extractor = FloatExtractor::with_config(ExtractorConfig::new().with_skip_header_rows(1));
//!
//! let values = extractor.extract_str(csv).unwrap();
//! assert_eq!(values, vec![120.5]);
//! ```
//!
//! ### Writing and reading float files
//!
//! ```rust,ignore
//! use tsbench::extract::io::{read_floats_file, write_floats_file};
//!
//! write_floats_file(&values, "floats.txt")?;
//! let back = read_floats_file("floats.txt")?;
//! assert_eq!(back, values);
//! ```
//!
//! ### Benchmarking
//!
//! ```rust
//! use tsbench::{BenchRunner, CodecKind};
//!
//! let values: Vec<f64> = (0..20_000).map(|i| 100.0 + (i / 10) as f64 * 0.01).collect();
//! let reports = BenchRunner::new().run_all(&values, &CodecKind::ALL).unwrap();
//!
//! for report in &reports {
//!     println!("{}: {:.2}x", report.codec, report.compression_ratio());
//! }
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use tsbench::{FloatCodec, GorillaCodec, TsbenchError};
//!
//! match GorillaCodec::new().decode(&[1, 2, 3]) {
//!     Ok(values) => println!("decoded {} values", values.len()),
//!     Err(TsbenchError::CodecError { codec, message }) => {
//!         eprintln!("{} failed: {}", codec, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod bench;
pub mod codec;
pub mod config;
pub mod error;
pub mod extract;

// Re-exports for convenience
pub use bench::{best_by_ratio, BenchRunner, CodecReport, PageStats};
pub use codec::{
    CodecKind, FloatCodec, GorillaCodec, Lz4Codec, QCompressCodec, RawCodec, SnapCodec, TszCodec,
    ZstdCodec,
};
pub use config::{BenchConfig, Config, ExtractorConfig, DEFAULT_PAGE_BYTES};
pub use error::{Result, TsbenchError};
pub use extract::{try_parse, ExtractionReport, FloatExtractor, TokenClass};

/// Thread safety verification module.
///
/// Compile-time assertions that the public types implement `Send` and
/// `Sync`. Nothing in the library shares mutable state, so a codec or an
/// extractor can be handed to another thread as is.
#[cfg(test)]
mod thread_safety {
    use super::*;

    /// Compile-time assertion that a type is Send + Sync.
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn extraction_types_are_send_sync() {
        assert_send_sync::<FloatExtractor>();
        assert_send_sync::<ExtractionReport>();
        assert_send_sync::<TokenClass>();
    }

    #[test]
    fn codec_types_are_send_sync() {
        assert_send_sync::<RawCodec>();
        assert_send_sync::<GorillaCodec>();
        assert_send_sync::<Lz4Codec>();
        assert_send_sync::<ZstdCodec>();
        assert_send_sync::<SnapCodec>();
        assert_send_sync::<TszCodec>();
        assert_send_sync::<QCompressCodec>();
        assert_send_sync::<CodecKind>();
        assert_send_sync::<Box<dyn FloatCodec>>();
    }

    #[test]
    fn bench_types_are_send_sync() {
        assert_send_sync::<BenchRunner>();
        assert_send_sync::<CodecReport>();
        assert_send_sync::<PageStats>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send_sync::<Config>();
        assert_send_sync::<ExtractorConfig>();
        assert_send_sync::<BenchConfig>();
    }

    #[test]
    fn error_types_are_send_sync() {
        assert_send_sync::<TsbenchError>();
    }

    /// Codecs can be shared across threads and used concurrently.
    #[test]
    fn test_concurrent_codec_use() {
        use std::sync::Arc;
        use std::thread;

        let codec: Arc<dyn FloatCodec> = Arc::new(GorillaCodec::new());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let codec = Arc::clone(&codec);
                thread::spawn(move || {
                    let data: Vec<f64> = (0..1000).map(|j| (i * 1000 + j) as f64 * 0.5).collect();
                    let decoded = codec.decode(&codec.encode(&data).unwrap()).unwrap();
                    decoded == data
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
