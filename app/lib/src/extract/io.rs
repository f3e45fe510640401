//! Float text files: one value per line.
//!
//! Values are written with the shortest decimal text that parses back to the
//! same `f64`, so [`write_floats`] followed by [`read_floats`] is lossless.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::error::{Result, TsbenchError};

/// Write values to `writer`, one per line, in order.
///
/// Nothing else is written: no header, no trailing metadata. Integral values
/// keep a `.0` suffix (`-2000.0`), infinities are written as `inf`/`-inf`.
///
/// # Examples
///
/// ```
/// use tsbench::extract::io::write_floats;
///
/// let mut out = Vec::new();
/// write_floats(&[1.5, -2000.0], &mut out).unwrap();
/// assert_eq!(out, b"1.5\n-2000.0\n");
/// ```
pub fn write_floats<W: Write>(values: &[f64], writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for value in values {
        writeln!(writer, "{:?}", value)?;
    }
    writer.flush()?;
    Ok(())
}

/// Create or overwrite `path` and write values to it.
///
/// An empty slice still creates an empty file.
pub fn write_floats_file<P: AsRef<Path>>(values: &[f64], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_floats(values, file)?;
    debug!("Wrote {} values to {}", values.len(), path.display());
    Ok(())
}

/// Read a float text file back.
///
/// Blank lines are ignored. Every other line must hold exactly one number;
/// anything else is a [`TsbenchError::FloatParseError`].
pub fn read_floats<R: Read>(reader: R) -> Result<Vec<f64>> {
    let reader = BufReader::new(reader);
    let mut values = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed
            .parse::<f64>()
            .map_err(|_| TsbenchError::FloatParseError {
                line: line_num + 1,
                token: trimmed.to_string(),
            })?;
        values.push(value);
    }

    Ok(values)
}

/// Open `path` and read it with [`read_floats`].
pub fn read_floats_file<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let values = read_floats(File::open(path)?)?;
    debug!("Read {} values from {}", values.len(), path.display());
    Ok(values)
}
