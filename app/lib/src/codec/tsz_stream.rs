//! Gorilla compression through the `tsz` crate.
//!
//! `tsz` compresses (timestamp, value) pairs. Every value is given the same
//! timestamp, so the timestamp column costs one bit per point and the
//! stream size is dominated by the XOR-encoded values.

use tsz::decode::Error as StreamError;
use tsz::stream::{BufferedReader, BufferedWriter};
use tsz::{DataPoint, Decode, Encode, StdDecoder, StdEncoder};

use crate::codec::FloatCodec;
use crate::error::{Result, TsbenchError};

const NAME: &str = "tsz";

/// Timestamp shared by every encoded point.
const TIMESTAMP: u64 = 1_482_892_260;

/// Gorilla codec backed by `tsz`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TszCodec;

impl TszCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl FloatCodec for TszCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn encode(&self, values: &[f64]) -> Result<Vec<u8>> {
        // An empty series is an empty blob rather than a bare header.
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let mut encoder = StdEncoder::new(TIMESTAMP, BufferedWriter::new());
        for &value in values {
            encoder.encode(DataPoint::new(TIMESTAMP, value));
        }
        Ok(encoder.close().into_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<f64>> {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }

        let reader = BufferedReader::new(bytes.to_vec().into_boxed_slice());
        let mut decoder = StdDecoder::new(reader);
        let mut values = Vec::new();
        loop {
            match decoder.next() {
                Ok(point) => values.push(point.get_value()),
                Err(StreamError::EndOfStream) => break,
                Err(e) => {
                    return Err(TsbenchError::codec(
                        NAME,
                        format!("stream error after {} values: {:?}", values.len(), e),
                    ))
                }
            }
        }
        Ok(values)
    }
}
