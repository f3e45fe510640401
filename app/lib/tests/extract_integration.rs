//! Integration tests for the float extraction pipeline.

use std::fs;

use tsbench::extract::io::{read_floats, read_floats_file, write_floats, write_floats_file};
use tsbench::{ExtractorConfig, FloatExtractor, TsbenchError};

#[test]
fn test_all_numeric_tokens_are_kept_in_order() {
    let csv = "1,2.5,-3\n4e2,\"5\",.5\n";
    let (values, report) = FloatExtractor::new()
        .extract_with_report(csv.as_bytes())
        .unwrap();

    assert_eq!(values, vec![1.0, 2.5, -3.0, 400.0, 5.0, 0.5]);
    assert_eq!(report.tokens, values.len());
    assert_eq!(report.rejected(), 0);
}

#[test]
fn test_non_numeric_tokens_do_not_shift_order() {
    let csv = "\"abc\",1,,2,\"$12\",3";
    let values = FloatExtractor::new().extract_str(csv).unwrap();
    assert_eq!(values, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_nan_tokens_are_excluded() {
    let csv = "\"nan\",\"NaN\",1,\"-nan\"";
    let values = FloatExtractor::new().extract_str(csv).unwrap();
    assert_eq!(values, vec![1.0]);
}

#[test]
fn test_statistics_bureau_layout() {
    // Wide layout: descriptive columns followed by one column per period.
    let csv = concat!(
        "\"FREQ\",\"Frequency\",\"L_MEASURE\",\"1977-Q4\",\"1978-Q1\",\"1978-Q2\"\n",
        "\"Q\",\"Quarterly\",\"S\",\"\",\"12.5\",\"NaN\"\n",
        "\"Q\",\"Quarterly\",\"F\",\"-0.75\",\"3e-2\",\"1978\"\n",
    );
    let values = FloatExtractor::new().extract_str(csv).unwrap();
    // Header years such as 1977-Q4 are not numbers; the bare 1978 is.
    assert_eq!(values, vec![12.5, -0.75, 0.03, 1978.0]);
}

#[test]
fn test_stock_history_layout_skips_header() {
    let csv = concat!(
        "Date,Open,High,Low,Close,Adj Close,Volume\n",
        "2019-01-02,154.89,158.85,154.23,157.92,152.78,37039700\n",
        "2019-01-03,143.98,145.72,142.00,142.19,137.57,null\n",
    );
    let config = ExtractorConfig::new().with_skip_header_rows(1);
    let (values, report) = FloatExtractor::with_config(config)
        .extract_with_report(csv.as_bytes())
        .unwrap();

    assert_eq!(report.skipped_records, 1);
    assert_eq!(report.records, 2);
    assert_eq!(values.len(), 11);
    assert_eq!(values[0], 154.89);
    assert_eq!(values[5], 37039700.0);
    assert_eq!(values[10], 137.57);
}

#[test]
fn test_extract_write_read_file_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("input.csv");
    let out_path = dir.path().join("floats.txt");

    fs::write(&csv_path, "\"1.5\",\"abc\",\"-2.0e3\",\"nan\"\n\"0.1\",\"inf\"\n").unwrap();

    let values = FloatExtractor::new().extract_file(&csv_path).unwrap();
    assert_eq!(values, vec![1.5, -2000.0, 0.1, f64::INFINITY]);

    write_floats_file(&values, &out_path).unwrap();
    assert_eq!(
        fs::read_to_string(&out_path).unwrap(),
        "1.5\n-2000.0\n0.1\ninf\n"
    );
    assert_eq!(read_floats_file(&out_path).unwrap(), values);
}

#[test]
fn test_empty_input_creates_empty_output() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("empty.csv");
    let out_path = dir.path().join("floats.txt");
    fs::write(&csv_path, "").unwrap();

    let values = FloatExtractor::new().extract_file(&csv_path).unwrap();
    assert!(values.is_empty());

    write_floats_file(&values, &out_path).unwrap();
    assert!(out_path.exists());
    assert_eq!(fs::read_to_string(&out_path).unwrap(), "");
}

#[test]
fn test_output_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("floats.txt");
    fs::write(&out_path, "stale\ncontent\nwith\nmore\nlines\n").unwrap();

    write_floats_file(&[7.0], &out_path).unwrap();
    assert_eq!(fs::read_to_string(&out_path).unwrap(), "7.0\n");
}

#[test]
fn test_unreadable_source_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be read as a file.
    let result = FloatExtractor::new().extract_file(dir.path());
    assert!(matches!(result, Err(TsbenchError::IoError(_))));
}

#[test]
fn test_write_then_read_in_memory() {
    let values = vec![1.0 / 3.0, 2.0f64.sqrt(), -1e21, 5e-324];
    let mut buf = Vec::new();
    write_floats(&values, &mut buf).unwrap();
    let back = read_floats(buf.as_slice()).unwrap();
    assert_eq!(back, values);
}

#[test]
fn test_underscore_digit_groups_are_not_numbers() {
    let values = FloatExtractor::new()
        .extract_str("1_000,\t2\t,+nan,-inf,1.")
        .unwrap();
    assert_eq!(values, vec![2.0, f64::NEG_INFINITY, 1.0]);
}
