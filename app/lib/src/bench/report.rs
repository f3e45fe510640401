//! Benchmark results.
//!
//! [`PageStats`] holds the measurements of one page, [`CodecReport`] the
//! pages of one codec run together with the aggregates derived from them.
//! Both are plain value types.

use std::fmt::Write as _;
use std::time::Duration;

/// Measurements for a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStats {
    /// Page index (0-indexed).
    pub index: usize,
    /// Number of values in the page.
    pub values: usize,
    /// Size of the values as raw `f64` data.
    pub original_bytes: usize,
    /// Size of the encoded blob.
    pub compressed_bytes: usize,
    /// Time spent encoding.
    pub encode_time: Duration,
    /// Time spent decoding.
    pub decode_time: Duration,
}

impl PageStats {
    /// Raw size over encoded size. Returns 0.0 if nothing was produced.
    pub fn compression_ratio(&self) -> f64 {
        if self.compressed_bytes > 0 {
            self.original_bytes as f64 / self.compressed_bytes as f64
        } else {
            0.0
        }
    }
}

/// Results of benchmarking one codec over a sequence of pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecReport {
    /// Codec name.
    pub codec: &'static str,
    /// Per-page measurements, in page order.
    pub pages: Vec<PageStats>,
}

impl CodecReport {
    /// Create a report from page measurements.
    pub fn new(codec: &'static str, pages: Vec<PageStats>) -> Self {
        Self { codec, pages }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of values across all pages.
    pub fn value_count(&self) -> usize {
        self.pages.iter().map(|p| p.values).sum()
    }

    /// Raw size of all values.
    pub fn original_bytes(&self) -> usize {
        self.pages.iter().map(|p| p.original_bytes).sum()
    }

    /// Encoded size of all pages.
    pub fn compressed_bytes(&self) -> usize {
        self.pages.iter().map(|p| p.compressed_bytes).sum()
    }

    /// Total raw size over total encoded size.
    pub fn compression_ratio(&self) -> f64 {
        let compressed = self.compressed_bytes();
        if compressed > 0 {
            self.original_bytes() as f64 / compressed as f64
        } else {
            0.0
        }
    }

    /// Mean of the per-page compression ratios.
    pub fn average_compression_ratio(&self) -> f64 {
        if self.pages.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.pages.iter().map(PageStats::compression_ratio).sum();
        sum / self.pages.len() as f64
    }

    /// Bytes saved over raw storage; negative when the codec expands.
    pub fn bytes_saved(&self) -> i64 {
        self.original_bytes() as i64 - self.compressed_bytes() as i64
    }

    /// Total encoding time.
    pub fn total_encode_time(&self) -> Duration {
        self.pages.iter().map(|p| p.encode_time).sum()
    }

    /// Total decoding time.
    pub fn total_decode_time(&self) -> Duration {
        self.pages.iter().map(|p| p.decode_time).sum()
    }

    /// Mean encoding time per page.
    pub fn average_encode_time(&self) -> Duration {
        average(self.total_encode_time(), self.pages.len())
    }

    /// Mean decoding time per page.
    pub fn average_decode_time(&self) -> Duration {
        average(self.total_decode_time(), self.pages.len())
    }

    /// Encoding throughput over raw bytes, in MB/s.
    pub fn encode_throughput(&self) -> f64 {
        throughput(self.original_bytes(), self.total_encode_time())
    }

    /// Decoding throughput over raw bytes, in MB/s.
    pub fn decode_throughput(&self) -> f64 {
        throughput(self.original_bytes(), self.total_decode_time())
    }

    /// Render the report as a results file block.
    pub fn to_results_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "Codec: {}\n\
             Pages: {}\n\
             Values: {}\n\
             Original bytes: {}\n\
             Compressed bytes: {}\n\
             Compression ratio: {}\n\
             Average Compression ratio: {}\n\
             Average Encoding speed: {:?}\n\
             Average Decoding speed: {:?}\n\
             Total Encoding speed: {:?}\n\
             Total Decoding speed: {:?}\n\n",
            self.codec,
            self.page_count(),
            self.value_count(),
            self.original_bytes(),
            self.compressed_bytes(),
            self.compression_ratio(),
            self.average_compression_ratio(),
            self.average_encode_time(),
            self.average_decode_time(),
            self.total_encode_time(),
            self.total_decode_time(),
        );
        out
    }
}

/// The report with the highest overall compression ratio.
pub fn best_by_ratio(reports: &[CodecReport]) -> Option<&CodecReport> {
    reports.iter().filter(|r| r.page_count() > 0).max_by(|a, b| {
        a.compression_ratio()
            .partial_cmp(&b.compression_ratio())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

fn average(total: Duration, count: usize) -> Duration {
    match u32::try_from(count) {
        Ok(0) => Duration::ZERO,
        Ok(n) => total / n,
        Err(_) => total.div_f64(count as f64),
    }
}

fn throughput(bytes: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        (bytes as f64 / 1_048_576.0) / secs
    } else {
        0.0
    }
}
