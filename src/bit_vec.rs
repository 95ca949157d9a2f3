/// MSB-first bit accumulator. Bits collect in `pending` until eight are
/// available, then the byte is flushed to `bits`.
#[derive(Default, Debug)]
pub struct BitVec {
    bits: Vec<u8>,
    pending: u8,
    pending_len: u8,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec::default()
    }

    pub fn push_bit(&mut self, bit: bool) {
        if bit {
            self.pending |= 1 << (7 - self.pending_len);
        }
        self.pending_len += 1;
        self.bit_count += 1;

        if self.pending_len == 8 {
            self.bits.push(self.pending);
            self.pending = 0;
            self.pending_len = 0;
        }
    }

    pub fn push_bits(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.push_bit(bit);
        }
    }

    /// Flushes a partially filled byte, high bits first and low bits zeroed,
    /// and returns the bytes together with the number of valid bits.
    pub fn finish(mut self) -> (Vec<u8>, usize) {
        if self.pending_len > 0 {
            self.bits.push(self.pending);
        }
        (self.bits, self.bit_count)
    }
}

/// Reads bits back out of a packed buffer in the order [`BitVec`] wrote them.
#[derive(Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
    limit: usize,
}

impl<'a> BitReader<'a> {
    /// `limit` is the number of valid bits; anything past it is padding.
    /// Callers must ensure `limit <= bytes.len() * 8`.
    pub fn new(bytes: &'a [u8], limit: usize) -> Self {
        debug_assert!(limit <= bytes.len() * 8);
        BitReader {
            bytes,
            position: 0,
            limit,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.position >= self.limit {
            return None;
        }
        let byte = self.bytes[self.position / 8];
        let bit = (byte >> (7 - self.position % 8)) & 1 == 1;
        self.position += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.limit - self.position;
        (remaining, Some(remaining))
    }
}
