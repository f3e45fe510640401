//! Configuration types for the tsbench library.
//!
//! This module provides configuration structs for float extraction and for the
//! codec benchmark, plus loading both from a JSON configuration file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::{QCompressCodec, ZstdCodec, MAX_Q_COMPRESS_LEVEL};
use crate::error::{Result, TsbenchError};

/// Page size used by the benchmark, in bytes of raw `f64` data.
pub const DEFAULT_PAGE_BYTES: usize = 65_535;

/// Configuration for the float extractor.
///
/// Records are read with an outer field separator and quote (the record
/// reader), then each field is split again on `delimiter` and each token has
/// `quote_char` stripped from both ends before it is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Token delimiter inside a field.
    ///
    /// Default: `,`
    pub delimiter: char,

    /// Quote character stripped from both ends of each token.
    ///
    /// Default: `"`
    pub quote_char: char,

    /// Number of leading records skipped before extraction starts.
    ///
    /// Counted in records, not lines: blank lines are not records and do
    /// not count toward the skip.
    ///
    /// Default: 0
    pub skip_header_rows: usize,

    /// Drop values that parse to NaN.
    ///
    /// Default: true
    pub drop_nan: bool,

    /// Field separator of the record reader. Must be ASCII.
    ///
    /// Default: space
    pub field_separator: char,

    /// Quote character of the record reader. Must be ASCII.
    ///
    /// Default: `|`
    pub field_quote: char,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote_char: '"',
            skip_header_rows: 0,
            drop_nan: true,
            field_separator: ' ',
            field_quote: '|',
        }
    }
}

impl ExtractorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character stripped from tokens.
    pub fn with_quote_char(mut self, quote_char: char) -> Self {
        self.quote_char = quote_char;
        self
    }

    /// Set the number of header records to skip.
    pub fn with_skip_header_rows(mut self, rows: usize) -> Self {
        self.skip_header_rows = rows;
        self
    }

    /// Enable or disable NaN filtering.
    pub fn with_drop_nan(mut self, drop_nan: bool) -> Self {
        self.drop_nan = drop_nan;
        self
    }

    /// Set the field separator of the record reader.
    pub fn with_field_separator(mut self, separator: char) -> Self {
        self.field_separator = separator;
        self
    }

    /// Set the quote character of the record reader.
    pub fn with_field_quote(mut self, quote: char) -> Self {
        self.field_quote = quote;
        self
    }

    /// Check that the record reader settings fit in a single byte.
    pub fn validate(&self) -> Result<()> {
        ascii_byte("field_separator", self.field_separator)?;
        ascii_byte("field_quote", self.field_quote)?;
        if self.field_separator == self.field_quote {
            return Err(TsbenchError::InvalidConfig(format!(
                "field_separator and field_quote are both {:?}",
                self.field_separator
            )));
        }
        Ok(())
    }

    pub(crate) fn field_separator_byte(&self) -> Result<u8> {
        ascii_byte("field_separator", self.field_separator)
    }

    pub(crate) fn field_quote_byte(&self) -> Result<u8> {
        ascii_byte("field_quote", self.field_quote)
    }
}

fn ascii_byte(name: &str, c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(TsbenchError::InvalidConfig(format!(
            "{} must be an ASCII character, got {:?}",
            name, c
        )))
    }
}

/// Configuration for the codec benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Page size in bytes of raw `f64` data. Each page holds
    /// `page_bytes / 8` values (at least one).
    ///
    /// Default: 65,535
    pub page_bytes: usize,

    /// Number of leading values skipped before the benchmark window.
    ///
    /// Default: 0
    pub skip_values: usize,

    /// Maximum number of values benchmarked after the skip.
    ///
    /// Default: None (all remaining values)
    pub max_values: Option<usize>,

    /// Compression level of the `zstd` codec.
    ///
    /// Default: 3
    pub zstd_level: i32,

    /// Compression level of the `q_compress` codec, 0 to 12.
    ///
    /// Default: 8
    pub q_compress_level: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            page_bytes: DEFAULT_PAGE_BYTES,
            skip_values: 0,
            max_values: None,
            zstd_level: ZstdCodec::DEFAULT_LEVEL,
            q_compress_level: QCompressCodec::DEFAULT_LEVEL,
        }
    }
}

impl BenchConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size in bytes.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is zero.
    pub fn with_page_bytes(mut self, bytes: usize) -> Self {
        assert!(bytes > 0, "page size must be > 0");
        self.page_bytes = bytes;
        self
    }

    /// Set the number of leading values to skip.
    pub fn with_skip_values(mut self, skip: usize) -> Self {
        self.skip_values = skip;
        self
    }

    /// Limit the number of values benchmarked.
    pub fn with_max_values(mut self, max: usize) -> Self {
        self.max_values = Some(max);
        self
    }

    /// Set the `zstd` compression level.
    pub fn with_zstd_level(mut self, level: i32) -> Self {
        self.zstd_level = level;
        self
    }

    /// Set the `q_compress` compression level.
    pub fn with_q_compress_level(mut self, level: usize) -> Self {
        self.q_compress_level = level;
        self
    }

    /// Number of values per page.
    pub fn page_len(&self) -> usize {
        (self.page_bytes / 8).max(1)
    }

    /// Check the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.page_bytes == 0 {
            return Err(TsbenchError::InvalidConfig(
                "page_bytes must be > 0".to_string(),
            ));
        }
        let zstd_levels = zstd::compression_level_range();
        if !zstd_levels.contains(&self.zstd_level) {
            return Err(TsbenchError::InvalidConfig(format!(
                "zstd_level {} is outside {}..={}",
                self.zstd_level,
                zstd_levels.start(),
                zstd_levels.end()
            )));
        }
        if self.q_compress_level > MAX_Q_COMPRESS_LEVEL {
            return Err(TsbenchError::InvalidConfig(format!(
                "q_compress_level {} is above {}",
                self.q_compress_level, MAX_Q_COMPRESS_LEVEL
            )));
        }
        Ok(())
    }

    /// Apply the skip/limit window to a sequence of values.
    pub fn window<'a>(&self, values: &'a [f64]) -> &'a [f64] {
        let start = self.skip_values.min(values.len());
        let rest = &values[start..];
        match self.max_values {
            Some(max) => &rest[..max.min(rest.len())],
            None => rest,
        }
    }
}

/// Top-level configuration, as stored in a JSON configuration file.
///
/// ```json
/// {
///   "extractor": { "skip_header_rows": 1, "drop_nan": false },
///   "bench": { "page_bytes": 65535, "max_values": 8191 }
/// }
/// ```
///
/// Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Float extractor settings.
    pub extractor: ExtractorConfig,
    /// Benchmark settings.
    pub bench: BenchConfig,
}

impl Config {
    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate()?;
        self.bench.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_config_default() {
        let config = ExtractorConfig::default();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.quote_char, '"');
        assert_eq!(config.skip_header_rows, 0);
        assert!(config.drop_nan);
        assert_eq!(config.field_separator, ' ');
        assert_eq!(config.field_quote, '|');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extractor_config_builder() {
        let config = ExtractorConfig::new()
            .with_delimiter(';')
            .with_quote_char('\'')
            .with_skip_header_rows(1)
            .with_drop_nan(false)
            .with_field_separator('\t')
            .with_field_quote('"');

        assert_eq!(config.delimiter, ';');
        assert_eq!(config.quote_char, '\'');
        assert_eq!(config.skip_header_rows, 1);
        assert!(!config.drop_nan);
        assert_eq!(config.field_separator_byte().unwrap(), b'\t');
        assert_eq!(config.field_quote_byte().unwrap(), b'"');
    }

    #[test]
    fn test_extractor_config_rejects_non_ascii_separator() {
        let config = ExtractorConfig::new().with_field_separator('§');
        assert!(matches!(
            config.validate(),
            Err(TsbenchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_extractor_config_rejects_same_separator_and_quote() {
        let config = ExtractorConfig::new().with_field_quote(' ');
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bench_config_default() {
        let config = BenchConfig::default();
        assert_eq!(config.page_bytes, 65_535);
        assert_eq!(config.page_len(), 8191);
        assert_eq!(config.skip_values, 0);
        assert_eq!(config.max_values, None);
        assert_eq!(config.zstd_level, 3);
        assert_eq!(config.q_compress_level, 8);
    }

    #[test]
    fn test_bench_config_codec_levels() {
        let config = BenchConfig::new().with_zstd_level(-10).with_q_compress_level(12);
        assert!(config.validate().is_ok());

        let config = BenchConfig::new().with_zstd_level(23);
        assert!(matches!(config.validate(), Err(TsbenchError::InvalidConfig(_))));

        let config = BenchConfig::new().with_q_compress_level(13);
        assert!(matches!(config.validate(), Err(TsbenchError::InvalidConfig(_))));
    }

    #[test]
    fn test_bench_config_small_page_holds_one_value() {
        let config = BenchConfig::new().with_page_bytes(3);
        assert_eq!(config.page_len(), 1);
    }

    #[test]
    #[should_panic(expected = "page size must be > 0")]
    fn test_bench_config_zero_page() {
        BenchConfig::new().with_page_bytes(0);
    }

    #[test]
    fn test_bench_config_window() {
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();

        let all = BenchConfig::new();
        assert_eq!(all.window(&values).len(), 10);

        let skipped = BenchConfig::new().with_skip_values(8);
        assert_eq!(skipped.window(&values), &[8.0, 9.0]);

        let limited = BenchConfig::new().with_skip_values(2).with_max_values(3);
        assert_eq!(limited.window(&values), &[2.0, 3.0, 4.0]);

        let past_end = BenchConfig::new().with_skip_values(20).with_max_values(3);
        assert!(past_end.window(&values).is_empty());
    }

    #[test]
    fn test_config_from_json_partial() {
        let config = Config::from_json_str(
            r#"{ "extractor": { "skip_header_rows": 1 }, "bench": { "max_values": 8191 } }"#,
        )
        .unwrap();
        assert_eq!(config.extractor.skip_header_rows, 1);
        assert_eq!(config.extractor.delimiter, ',');
        assert_eq!(config.bench.max_values, Some(8191));
        assert_eq!(config.bench.page_bytes, DEFAULT_PAGE_BYTES);
    }

    #[test]
    fn test_config_from_json_empty_object() {
        assert_eq!(Config::from_json_str("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_config_from_json_invalid_values() {
        let result = Config::from_json_str(r#"{ "bench": { "page_bytes": 0 } }"#);
        assert!(matches!(result, Err(TsbenchError::InvalidConfig(_))));

        let result = Config::from_json_str(r#"{ "bench": { "q_compress_level": 40 } }"#);
        assert!(matches!(result, Err(TsbenchError::InvalidConfig(_))));

        let result = Config::from_json_str(r#"{ "extractor": { "drop_nan": "yes" } }"#);
        assert!(matches!(result, Err(TsbenchError::ConfigParseError(_))));
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tsbench.json");
        fs::write(&path, r#"{ "extractor": { "drop_nan": false } }"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(!config.extractor.drop_nan);
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExtractorConfig>();
        assert_send_sync::<BenchConfig>();
        assert_send_sync::<Config>();
    }
}
