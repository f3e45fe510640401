//! Gorilla-style XOR delta codec for `f64` series.
//!
//! Each value is XORed with its predecessor. Identical neighbours cost one
//! bit; otherwise only the meaningful bits of the XOR are stored, reusing the
//! previous leading/trailing-zero window when it still covers them.
//!
//! # Stream layout
//!
//! ```text
//! count: u64 little-endian
//! first value: 64 bits
//! per following value:
//!   0                                   same as previous
//!   1 0 <meaningful bits>               fits the previous window
//!   1 1 <lead:5> <sig-1:6> <sig bits>   new window
//! ```
//!
//! Leading zeros are clamped to 31 so they fit in five bits.

use crate::codec::bits::{BitReader, BitWriter};
use crate::codec::FloatCodec;
use crate::error::{Result, TsbenchError};

const NAME: &str = "gorilla";

/// Largest leading-zero count the 5-bit field can hold.
const MAX_LEADING_ZEROS: u32 = 31;

const HEADER_BYTES: usize = 8;

/// XOR delta codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct GorillaCodec;

impl GorillaCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl FloatCodec for GorillaCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn encode(&self, values: &[f64]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(HEADER_BYTES + values.len() * 2);
        out.extend_from_slice(&(values.len() as u64).to_le_bytes());

        let Some((first, rest)) = values.split_first() else {
            return Ok(out);
        };

        let mut writer = BitWriter::with_capacity(8 + rest.len() * 2);
        let mut previous = first.to_bits();
        writer.write_bits(previous, 64);

        // (leading, trailing) zeros of the last stored window
        let mut window: Option<(u32, u32)> = None;

        for value in rest {
            let current = value.to_bits();
            let xor = current ^ previous;
            previous = current;

            if xor == 0 {
                writer.write_bit(false);
                continue;
            }
            writer.write_bit(true);

            let leading = xor.leading_zeros().min(MAX_LEADING_ZEROS);
            let trailing = xor.trailing_zeros();

            match window {
                Some((prev_leading, prev_trailing))
                    if leading >= prev_leading && trailing >= prev_trailing =>
                {
                    writer.write_bit(false);
                    writer.write_bits(xor >> prev_trailing, 64 - prev_leading - prev_trailing);
                }
                _ => {
                    let significant = 64 - leading - trailing;
                    writer.write_bit(true);
                    writer.write_bits(leading as u64, 5);
                    writer.write_bits((significant - 1) as u64, 6);
                    writer.write_bits(xor >> trailing, significant);
                    window = Some((leading, trailing));
                }
            }
        }

        out.extend_from_slice(&writer.into_vec());
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<f64>> {
        if bytes.len() < HEADER_BYTES {
            return Err(TsbenchError::codec(NAME, "missing value count header"));
        }
        let (header, body) = bytes.split_at(HEADER_BYTES);
        let mut count_bytes = [0u8; HEADER_BYTES];
        count_bytes.copy_from_slice(header);
        let count = u64::from_le_bytes(count_bytes);

        if count == 0 {
            return Ok(Vec::new());
        }

        let mut reader = BitReader::new(body);
        // 64 bits for the first value, at least one bit for every other one
        if (count - 1).saturating_add(64) > reader.remaining() as u64 {
            return Err(TsbenchError::codec(
                NAME,
                format!("{} values cannot fit in {} bytes", count, body.len()),
            ));
        }
        let count = count as usize;

        let mut values = Vec::with_capacity(count);
        let mut previous = read(&mut reader, 64)?;
        values.push(f64::from_bits(previous));

        let mut window: Option<(u32, u32)> = None;

        for _ in 1..count {
            if read(&mut reader, 1)? == 0 {
                values.push(f64::from_bits(previous));
                continue;
            }

            let (leading, trailing) = if read(&mut reader, 1)? == 1 {
                let leading = read(&mut reader, 5)? as u32;
                let significant = read(&mut reader, 6)? as u32 + 1;
                if leading + significant > 64 {
                    return Err(TsbenchError::codec(
                        NAME,
                        format!(
                            "window of {} leading zeros and {} significant bits exceeds 64",
                            leading, significant
                        ),
                    ));
                }
                let w = (leading, 64 - leading - significant);
                window = Some(w);
                w
            } else {
                window.ok_or_else(|| {
                    TsbenchError::codec(NAME, "window reused before one was stored")
                })?
            };

            let meaningful = read(&mut reader, 64 - leading - trailing)?;
            previous ^= meaningful << trailing;
            values.push(f64::from_bits(previous));
        }

        Ok(values)
    }
}

fn read(reader: &mut BitReader<'_>, bits: u32) -> Result<u64> {
    reader
        .read_bits(bits)
        .ok_or_else(|| TsbenchError::codec(NAME, "bit stream truncated"))
}
