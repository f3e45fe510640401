use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tsbench::extract::io::{read_floats, write_floats};
use tsbench::{
    best_by_ratio, BenchRunner, CodecKind, CodecReport, Config, FloatExtractor, TsbenchError,
};

/// Extract floats from delimited time-series files and benchmark float codecs
#[derive(Parser)]
#[command(name = "tsbench")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Configuration file path (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Codec selection for the bench command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CodecArg {
    /// 8 little-endian bytes per value (baseline)
    Raw,
    /// Gorilla XOR delta encoding
    Gorilla,
    /// LZ4 block compression
    Lz4,
    /// Byte shuffle followed by LZ4
    ShuffleLz4,
    /// Zstandard
    Zstd,
    /// Snappy frames
    Snap,
    /// Gorilla through the tsz crate
    Tsz,
    /// Quantile compression
    #[value(name = "q_compress")]
    QCompress,
    /// Every codec, baseline first
    All,
}

impl CodecArg {
    fn kinds(&self) -> Vec<CodecKind> {
        match self {
            CodecArg::Raw => vec![CodecKind::Raw],
            CodecArg::Gorilla => vec![CodecKind::Gorilla],
            CodecArg::Lz4 => vec![CodecKind::Lz4],
            CodecArg::ShuffleLz4 => vec![CodecKind::ShuffleLz4],
            CodecArg::Zstd => vec![CodecKind::Zstd],
            CodecArg::Snap => vec![CodecKind::Snap],
            CodecArg::Tsz => vec![CodecKind::Tsz],
            CodecArg::QCompress => vec![CodecKind::QCompress],
            CodecArg::All => CodecKind::ALL.to_vec(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract floats from a delimited text file, one value per output line
    Extract {
        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Output file (use '-' for stdout)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        output: String,

        /// Number of leading records to skip
        #[arg(long, value_name = "N")]
        skip_header: Option<usize>,

        /// Keep values that parse to NaN
        #[arg(long)]
        keep_nan: bool,

        /// Token delimiter inside a field
        #[arg(long, value_name = "CHAR")]
        delimiter: Option<char>,

        /// Quote character stripped from tokens
        #[arg(long, value_name = "CHAR")]
        quote: Option<char>,

        /// Field separator of the record reader
        #[arg(long, value_name = "CHAR")]
        field_separator: Option<char>,

        /// Quote character of the record reader
        #[arg(long, value_name = "CHAR")]
        field_quote: Option<char>,
    },

    /// Benchmark codecs on a float text file
    Bench {
        /// Input float file, one value per line (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Codec to benchmark
        #[arg(long, value_enum, default_value = "all")]
        codec: CodecArg,

        /// Page size in bytes of raw f64 data
        #[arg(long, value_name = "BYTES")]
        page_bytes: Option<usize>,

        /// Number of leading values to skip
        #[arg(long, value_name = "N")]
        skip: Option<usize>,

        /// Maximum number of values to benchmark
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        /// Compression level for zstd
        #[arg(long, value_name = "LEVEL", allow_negative_numbers = true)]
        zstd_level: Option<i32>,

        /// Compression level for q_compress (0-12)
        #[arg(long, value_name = "LEVEL")]
        q_compress_level: Option<usize>,

        /// Directory for per-codec result files
        #[arg(long, value_name = "DIR")]
        results_dir: Option<PathBuf>,
    },

    /// Display statistics about a float text file
    Info {
        /// Input float file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity flags
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration if specified
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else {
        Config::default()
    };

    // Execute the appropriate command
    match cli.command {
        Commands::Extract {
            input,
            output,
            skip_header,
            keep_nan,
            delimiter,
            quote,
            field_separator,
            field_quote,
        } => {
            let mut extractor_config = config.extractor;
            if let Some(rows) = skip_header {
                extractor_config.skip_header_rows = rows;
            }
            if keep_nan {
                extractor_config.drop_nan = false;
            }
            if let Some(c) = delimiter {
                extractor_config.delimiter = c;
            }
            if let Some(c) = quote {
                extractor_config.quote_char = c;
            }
            if let Some(c) = field_separator {
                extractor_config.field_separator = c;
            }
            if let Some(c) = field_quote {
                extractor_config.field_quote = c;
            }
            extractor_config
                .validate()
                .map_err(|e| map_tsbench_error(e, "Extractor configuration"))?;

            extract_command(&input, &output, FloatExtractor::with_config(extractor_config), cli.quiet)?;
        }
        Commands::Bench {
            input,
            codec,
            page_bytes,
            skip,
            limit,
            zstd_level,
            q_compress_level,
            results_dir,
        } => {
            let mut bench_config = config.bench;
            if let Some(bytes) = page_bytes {
                bench_config.page_bytes = bytes;
            }
            if let Some(n) = skip {
                bench_config.skip_values = n;
            }
            if limit.is_some() {
                bench_config.max_values = limit;
            }
            if let Some(level) = zstd_level {
                bench_config.zstd_level = level;
            }
            if let Some(level) = q_compress_level {
                bench_config.q_compress_level = level;
            }
            bench_config
                .validate()
                .map_err(|e| map_tsbench_error(e, "Benchmark configuration"))?;

            bench_command(
                &input,
                &codec.kinds(),
                BenchRunner::with_config(bench_config),
                results_dir.as_deref(),
                cli.quiet,
            )?;
        }
        Commands::Info { input } => {
            info_command(&input, cli.quiet)?;
        }
    }

    Ok(())
}

/// Set up logging based on verbosity flags
fn setup_logging(verbose: bool, quiet: bool) {
    let log_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logging initialized at {} level", log_level);
}

/// Load configuration from a JSON file
fn load_config(path: &Path) -> Result<Config> {
    debug!("Loading configuration from {}", path.display());
    Config::from_file(path).map_err(|e| {
        map_tsbench_error(e, &format!("Loading configuration {}", path.display()))
    })
}

/// Open input as a reader: a file, or stdin for '-'
fn open_input(input: &str) -> Result<Box<dyn Read>> {
    if input == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        let file =
            File::open(input).with_context(|| format!("Failed to open input file: {}", input))?;
        Ok(Box::new(file))
    }
}

/// Open output as a writer: a file (created or truncated), or stdout for '-'
fn open_output(output: &str) -> Result<Box<dyn Write>> {
    if output == "-" {
        Ok(Box::new(io::stdout().lock()))
    } else {
        let file = File::create(output)
            .with_context(|| format!("Failed to create output file: {}", output))?;
        Ok(Box::new(file))
    }
}

/// Read a float text file from a path or stdin
fn load_floats(input: &str) -> Result<Vec<f64>> {
    let reader = open_input(input)?;
    read_floats(reader).map_err(|e| map_tsbench_error(e, &format!("Reading floats from {}", input)))
}

/// Execute the extract command
fn extract_command(input: &str, output: &str, extractor: FloatExtractor, quiet: bool) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting extraction: {} -> {}", input, output);
    debug!("Extractor configuration: {:?}", extractor.config());

    let progress = create_progress_bar(quiet, "Extracting floats");
    let reader = open_input(input)?;
    let (values, report) = extractor
        .extract_with_report(reader)
        .map_err(|e| map_tsbench_error(e, "Float extraction"))?;
    progress.finish_and_clear();

    if values.is_empty() {
        warn!("No numeric values found in {}", input);
    }

    let progress = create_progress_bar(quiet, "Writing output");
    let writer = open_output(output)?;
    write_floats(&values, writer).map_err(|e| map_tsbench_error(e, "Writing floats"))?;
    progress.finish_and_clear();

    let total_duration = start_time.elapsed();

    // Display summary
    if !quiet {
        eprintln!("✓ Extraction complete");
        eprintln!("  Records:     {}", report.records);
        if report.skipped_records > 0 {
            eprintln!("  Skipped:     {} header record(s)", report.skipped_records);
        }
        eprintln!("  Tokens:      {}", report.tokens);
        eprintln!("  Values:      {}", report.accepted);
        eprintln!("  Non-numeric: {}", report.non_numeric);
        eprintln!("  NaN dropped: {}", report.nan);
        eprintln!("  Time:        {:.3}s", total_duration.as_secs_f64());
    }

    info!(
        "Extraction completed in {:.3}s",
        total_duration.as_secs_f64()
    );

    Ok(())
}

/// Execute the bench command
fn bench_command(
    input: &str,
    kinds: &[CodecKind],
    runner: BenchRunner,
    results_dir: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting benchmark on {}", input);

    let progress = create_progress_bar(quiet, "Reading input");
    let values = load_floats(input)?;
    progress.finish_and_clear();

    let window_len = runner.config().window(&values).len();
    debug!(
        "Read {} values, benchmarking {} in pages of {}",
        values.len(),
        window_len,
        runner.config().page_len()
    );

    if window_len == 0 {
        warn!("Nothing to benchmark: no values in the selected window");
    }

    let mut reports = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let progress = create_progress_bar(quiet, &format!("Benchmarking {}", kind));
        let report = runner
            .run_kind(&values, kind)
            .map_err(|e| map_tsbench_error(e, &format!("Benchmarking {}", kind)))?;
        progress.finish_and_clear();
        info!("{} done", kind);
        reports.push(report);
    }

    if let Some(dir) = results_dir {
        write_results(dir, input, &reports)?;
    }

    if !quiet {
        print_report_table(&reports);
        if let Some(best) = best_by_ratio(&reports) {
            println!(
                "\nBest ratio: {} ({:.3}x)",
                best.codec,
                best.compression_ratio()
            );
        }
    }

    info!(
        "Benchmark completed in {:.3}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Write one results file per codec, named `<codec>_<input file name>`
fn write_results(dir: &Path, input: &str, reports: &[CodecReport]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create results directory: {}", dir.display()))?;

    let data_name = if input == "-" {
        "stdin.txt".to_string()
    } else {
        Path::new(input)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "floats.txt".to_string())
    };

    for report in reports {
        let path = dir.join(format!("{}_{}", report.codec, data_name));
        fs::write(&path, report.to_results_text())
            .with_context(|| format!("Failed to write results file: {}", path.display()))?;
        debug!("Wrote {}", path.display());
    }

    Ok(())
}

/// Print a summary table of codec reports
fn print_report_table(reports: &[CodecReport]) {
    println!(
        "{:<12} {:>6} {:>12} {:>12} {:>8} {:>10} {:>12} {:>12}",
        "Codec", "Pages", "Original", "Compressed", "Ratio", "Avg ratio", "Enc MB/s", "Dec MB/s"
    );
    for report in reports {
        println!(
            "{:<12} {:>6} {:>12} {:>12} {:>8.3} {:>10.3} {:>12.1} {:>12.1}",
            report.codec,
            report.page_count(),
            format_bytes(report.original_bytes()),
            format_bytes(report.compressed_bytes()),
            report.compression_ratio(),
            report.average_compression_ratio(),
            report.encode_throughput(),
            report.decode_throughput(),
        );
    }
}

/// Summary statistics of a float sequence
#[derive(Debug, Default)]
struct FloatStats {
    count: usize,
    finite: usize,
    infinite: usize,
    nan: usize,
    min: Option<f64>,
    max: Option<f64>,
    sum: f64,
    distinct_neighbours: usize,
}

impl FloatStats {
    fn collect(values: &[f64]) -> Self {
        let mut stats = FloatStats {
            count: values.len(),
            ..Default::default()
        };

        for (i, &v) in values.iter().enumerate() {
            if v.is_nan() {
                stats.nan += 1;
            } else {
                if v.is_infinite() {
                    stats.infinite += 1;
                } else {
                    stats.finite += 1;
                    stats.sum += v;
                }
                stats.min = Some(stats.min.map_or(v, |m| m.min(v)));
                stats.max = Some(stats.max.map_or(v, |m| m.max(v)));
            }
            if i > 0 && values[i - 1].to_bits() != v.to_bits() {
                stats.distinct_neighbours += 1;
            }
        }

        stats
    }

    fn mean(&self) -> Option<f64> {
        (self.finite > 0).then(|| self.sum / self.finite as f64)
    }

    /// Share of values equal to their predecessor
    fn repeat_rate(&self) -> f64 {
        if self.count > 1 {
            (1.0 - self.distinct_neighbours as f64 / (self.count - 1) as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Execute the info command
fn info_command(input: &str, quiet: bool) -> Result<()> {
    info!("Reading float file info from {}", input);

    let progress = create_progress_bar(quiet, "Reading input");
    let values = load_floats(input)?;
    progress.finish_and_clear();

    if values.is_empty() {
        warn!("Input holds no values");
    }

    if quiet {
        return Ok(());
    }

    let stats = FloatStats::collect(&values);
    let page_len = tsbench::BenchConfig::default().page_len();

    println!("=== Float File Information ===\n");
    println!("Values: {}", stats.count);
    println!("Raw size: {}", format_bytes(stats.count * 8));
    println!("Pages: {} (of {} values)", stats.count.div_ceil(page_len), page_len);
    println!("Finite: {}", stats.finite);
    if stats.infinite > 0 {
        println!("Infinite: {}", stats.infinite);
    }
    if stats.nan > 0 {
        println!("NaN: {}", stats.nan);
    }
    if let (Some(min), Some(max)) = (stats.min, stats.max) {
        println!("Min: {}", min);
        println!("Max: {}", max);
    }
    if let Some(mean) = stats.mean() {
        println!("Mean (finite): {}", mean);
    }
    println!("Repeated neighbours: {:.1}%", stats.repeat_rate());
    println!();

    Ok(())
}

/// Create a progress bar (spinner) for operations
fn create_progress_bar(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        // Return a hidden progress bar in quiet mode
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Format bytes in human-readable format
fn format_bytes(bytes: usize) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Map TsbenchError to anyhow::Error with context
fn map_tsbench_error(error: TsbenchError, context: &str) -> anyhow::Error {
    match error {
        TsbenchError::IoError(e) => anyhow::anyhow!("{}: IO error: {}", context, e),
        TsbenchError::CsvReadError { line, message } => {
            anyhow::anyhow!("{}: CSV read error at line {}: {}", context, line, message)
        }
        TsbenchError::FloatParseError { line, token } => {
            anyhow::anyhow!(
                "{}: line {} is not a number: {:?}",
                context,
                line,
                token
            )
        }
        TsbenchError::CodecError { codec, message } => {
            anyhow::anyhow!("{}: {} codec error: {}", context, codec, message)
        }
        TsbenchError::RoundTripMismatch { codec, page, index } => {
            anyhow::anyhow!(
                "{}: {} did not round-trip page {} (first difference at value {})",
                context,
                codec,
                page,
                index
            )
        }
        TsbenchError::InvalidConfig(message) => {
            anyhow::anyhow!("{}: invalid configuration: {}", context, message)
        }
        TsbenchError::ConfigParseError(e) => {
            anyhow::anyhow!("{}: configuration parse error: {}", context, e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(65_528), "63.99 KB");
    }

    #[test]
    fn test_codec_arg_kinds() {
        assert_eq!(CodecArg::Gorilla.kinds(), vec![CodecKind::Gorilla]);
        assert_eq!(CodecArg::QCompress.kinds(), vec![CodecKind::QCompress]);
        assert_eq!(CodecArg::All.kinds(), CodecKind::ALL.to_vec());
    }

    #[test]
    fn test_float_stats() {
        let stats = FloatStats::collect(&[1.0, 1.0, 3.0, f64::INFINITY, f64::NAN]);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.finite, 3);
        assert_eq!(stats.infinite, 1);
        assert_eq!(stats.nan, 1);
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(f64::INFINITY));
        assert_eq!(stats.mean(), Some(5.0 / 3.0));
        assert_eq!(stats.repeat_rate(), 25.0);
    }

    #[test]
    fn test_float_stats_empty() {
        let stats = FloatStats::collect(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.min, None);
        assert_eq!(stats.mean(), None);
        assert_eq!(stats.repeat_rate(), 0.0);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
