//! Float extraction from delimited text.
//!
//! The [`FloatExtractor`] reads records with the `csv` crate, splits each
//! field again on the token delimiter, strips quotes from every token and
//! keeps the tokens that parse as floats. Tokens that do not parse, and
//! NaN values when NaN filtering is on, are dropped without error.
//!
//! # Examples
//!
//! ```
//! use tsbench::FloatExtractor;
//!
//! let extractor = FloatExtractor::new();
//! let values = extractor
//!     .extract_str("\"1.5\",\"abc\",\"-2.0e3\",\"nan\"")
//!     .unwrap();
//! assert_eq!(values, vec![1.5, -2000.0]);
//! ```

pub mod io;
mod token;

pub use token::{classify, clean_token, try_parse, TokenClass};

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, trace};

use crate::config::ExtractorConfig;
use crate::error::Result;

/// Counters gathered during one extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Records scanned after the header skip.
    pub records: usize,
    /// Header records skipped.
    pub skipped_records: usize,
    /// Tokens seen in scanned records.
    pub tokens: usize,
    /// Values kept.
    pub accepted: usize,
    /// Tokens dropped because they do not parse.
    pub non_numeric: usize,
    /// Tokens dropped because they parse to NaN.
    pub nan: usize,
}

impl ExtractionReport {
    /// Tokens dropped for any reason.
    pub fn rejected(&self) -> usize {
        self.non_numeric + self.nan
    }

    fn record(&mut self, class: TokenClass) {
        self.tokens += 1;
        match class {
            TokenClass::Value(_) => self.accepted += 1,
            TokenClass::NonNumeric => self.non_numeric += 1,
            TokenClass::NaN => self.nan += 1,
        }
    }
}

/// Extracts 64-bit floats from delimited text.
///
/// The extractor holds no state between calls; the output sequence is owned
/// by the call that produced it.
#[derive(Debug, Clone, Default)]
pub struct FloatExtractor {
    config: ExtractorConfig,
}

impl FloatExtractor {
    /// Create an extractor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract every kept value from `reader`, in input order.
    ///
    /// The whole input is consumed before the sequence is returned. I/O
    /// failures are propagated; token-level problems are not errors.
    pub fn extract<R: Read>(&self, reader: R) -> Result<Vec<f64>> {
        self.extract_with_report(reader).map(|(values, _)| values)
    }

    /// Like [`extract`](Self::extract), also returning the pass counters.
    ///
    /// Fails with `InvalidConfig` before reading anything if the extractor
    /// configuration does not validate.
    pub fn extract_with_report<R: Read>(&self, reader: R) -> Result<(Vec<f64>, ExtractionReport)> {
        self.config.validate()?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.config.field_separator_byte()?)
            .quote(self.config.field_quote_byte()?)
            .from_reader(reader);

        let mut values = Vec::new();
        let mut report = ExtractionReport::default();
        let mut record = csv::ByteRecord::new();

        while reader.read_byte_record(&mut record)? {
            if report.skipped_records < self.config.skip_header_rows {
                report.skipped_records += 1;
                trace!("Skipping header record {}", report.skipped_records);
                continue;
            }
            report.records += 1;

            for field in record.iter() {
                let field = String::from_utf8_lossy(field);
                for token in field.split(self.config.delimiter) {
                    let class = classify(token, self.config.quote_char, self.config.drop_nan);
                    report.record(class);
                    if let TokenClass::Value(v) = class {
                        values.push(v);
                    }
                }
            }
        }

        debug!(
            "Extracted {} values from {} records ({} tokens, {} non-numeric, {} NaN)",
            report.accepted, report.records, report.tokens, report.non_numeric, report.nan
        );

        Ok((values, report))
    }

    /// Extract from an in-memory string.
    pub fn extract_str(&self, input: &str) -> Result<Vec<f64>> {
        self.extract(input.as_bytes())
    }

    /// Open `path` for the duration of the scan and extract from it.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<f64>> {
        self.extract_file_with_report(path).map(|(values, _)| values)
    }

    /// Open `path` for the duration of the scan, returning values and counters.
    pub fn extract_file_with_report<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<(Vec<f64>, ExtractionReport)> {
        let path = path.as_ref();
        debug!("Extracting floats from {}", path.display());
        let file = File::open(path)?;
        self.extract_with_report(file)
    }
}
