//! Codec benchmark runner.
//!
//! The runner cuts the input into pages of `page_bytes / 8` values, encodes
//! and decodes every page with the codec under test, checks that decoding
//! gave back the same bits, and records sizes and timings per page.
//!
//! # Examples
//!
//! ```
//! use tsbench::{BenchConfig, BenchRunner, CodecKind};
//!
//! let values: Vec<f64> = (0..10_000).map(|i| i as f64 * 0.5).collect();
//! let runner = BenchRunner::with_config(BenchConfig::new().with_page_bytes(8 * 4096));
//!
//! let report = runner.run_kind(&values, CodecKind::Gorilla).unwrap();
//! assert_eq!(report.page_count(), 3);
//! assert_eq!(report.value_count(), 10_000);
//! assert!(report.compression_ratio() > 1.0);
//! ```

mod report;

pub use report::{best_by_ratio, CodecReport, PageStats};

use std::time::Instant;

use log::{debug, trace};

use crate::codec::{CodecKind, FloatCodec};
use crate::config::BenchConfig;
use crate::error::{Result, TsbenchError};

/// Runs codecs over paged input and collects [`CodecReport`]s.
#[derive(Debug, Clone, Default)]
pub struct BenchRunner {
    config: BenchConfig,
}

impl BenchRunner {
    /// Create a runner with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with a custom configuration.
    pub fn with_config(config: BenchConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// The pages the runner will benchmark, after windowing.
    pub fn pages<'a>(&self, values: &'a [f64]) -> std::slice::Chunks<'a, f64> {
        self.config.window(values).chunks(self.config.page_len())
    }

    /// Benchmark one codec.
    ///
    /// Fails on the first codec error or round-trip mismatch.
    pub fn run(&self, values: &[f64], codec: &dyn FloatCodec) -> Result<CodecReport> {
        let name = codec.name();
        let mut pages = Vec::new();

        for (index, page) in self.pages(values).enumerate() {
            let start = Instant::now();
            let encoded = codec.encode(page)?;
            let encode_time = start.elapsed();

            let start = Instant::now();
            let decoded = codec.decode(&encoded)?;
            let decode_time = start.elapsed();

            verify_page(name, index, page, &decoded)?;

            trace!(
                "{}: page {} {} values -> {} bytes",
                name,
                index,
                page.len(),
                encoded.len()
            );

            pages.push(PageStats {
                index,
                values: page.len(),
                original_bytes: std::mem::size_of_val(page),
                compressed_bytes: encoded.len(),
                encode_time,
                decode_time,
            });
        }

        let report = CodecReport::new(name, pages);
        debug!(
            "{}: {} pages, {} -> {} bytes ({:.2}x)",
            name,
            report.page_count(),
            report.original_bytes(),
            report.compressed_bytes(),
            report.compression_ratio()
        );
        Ok(report)
    }

    /// Benchmark one of the bundled codecs, at the configured levels.
    pub fn run_kind(&self, values: &[f64], kind: CodecKind) -> Result<CodecReport> {
        self.run(values, kind.build_with(&self.config).as_ref())
    }

    /// Benchmark several bundled codecs in order.
    pub fn run_all(&self, values: &[f64], kinds: &[CodecKind]) -> Result<Vec<CodecReport>> {
        kinds.iter().map(|&kind| self.run_kind(values, kind)).collect()
    }
}

/// Check that a decoded page holds exactly the original bits.
fn verify_page(codec: &'static str, page: usize, original: &[f64], decoded: &[f64]) -> Result<()> {
    if let Some(index) = original
        .iter()
        .zip(decoded)
        .position(|(a, b)| a.to_bits() != b.to_bits())
    {
        return Err(TsbenchError::RoundTripMismatch { codec, page, index });
    }
    if original.len() != decoded.len() {
        return Err(TsbenchError::RoundTripMismatch {
            codec,
            page,
            index: decoded.len().min(original.len()),
        });
    }
    Ok(())
}
