//! Bit stream reader and writer.
//!
//! Bits are packed most-significant first within each byte, and multi-bit
//! values are written most-significant bit first.

/// Number of bits in a byte.
const BYTE_BITS: u32 = 8;

/// Growable bit writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitWriter {
    buff: Vec<u8>,
    /// Bits used in the last byte, 0 when the last byte is full.
    used: u32,
}

impl BitWriter {
    /// Create a writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buff: Vec::with_capacity(capacity),
            used: 0,
        }
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u64, 1);
    }

    /// Write the low `bits` bits of `value` (at most 64).
    pub fn write_bits(&mut self, value: u64, mut bits: u32) {
        debug_assert!(bits <= 64);

        while bits > 0 {
            if self.used == 0 {
                self.buff.push(0);
            }
            let free = BYTE_BITS - self.used;
            let take = free.min(bits);
            let chunk = ((value >> (bits - take)) & ((1u64 << take) - 1)) as u8;

            let last = self.buff.len() - 1;
            self.buff[last] |= chunk << (free - take);

            self.used = (self.used + take) % BYTE_BITS;
            bits -= take;
        }
    }

    /// Total number of bits written.
    pub fn bit_len(&self) -> usize {
        match self.used {
            0 => self.buff.len() * BYTE_BITS as usize,
            used => (self.buff.len() - 1) * BYTE_BITS as usize + used as usize,
        }
    }

    /// Consume the writer, returning the bytes. The last byte is zero-padded.
    pub fn into_vec(self) -> Vec<u8> {
        self.buff
    }
}

/// Bit reader over a byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buff: &'a [u8],
    /// Absolute bit position.
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the first bit of `buff`.
    pub fn new(buff: &'a [u8]) -> Self {
        Self { buff, pos: 0 }
    }

    /// Bits left to read, padding included.
    pub fn remaining(&self) -> usize {
        self.buff.len() * BYTE_BITS as usize - self.pos
    }

    /// Read one bit, or `None` at the end of the buffer.
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        self.read_bits(1).map(|b| b == 1)
    }

    /// Read `bits` bits (at most 64), or `None` if not enough are left.
    pub fn read_bits(&mut self, mut bits: u32) -> Option<u64> {
        debug_assert!(bits <= 64);
        if self.remaining() < bits as usize {
            return None;
        }

        let mut output = 0u64;
        while bits > 0 {
            let byte = self.buff[self.pos / BYTE_BITS as usize];
            let avail = BYTE_BITS - (self.pos % BYTE_BITS as usize) as u32;
            let take = avail.min(bits);
            let chunk = (byte >> (avail - take)) & (((1u16 << take) - 1) as u8);

            output = (output << take) | chunk as u64;
            self.pos += take as usize;
            bits -= take;
        }

        Some(output)
    }
}
