//! Canonical Huffman decoding tables.
//!
//! A table is built from a vector of per-symbol code lengths (length 0 means
//! the symbol has no code). Canonical construction assigns consecutive code
//! values within each length, with the first code of length L+1 equal to
//! `(first_code(L) + count(L)) << 1`. Because codes of one length form a
//! single contiguous range, decoding needs only the per-length counts, the
//! first code of each length, and the symbols sorted by (length, symbol):
//! a few hundred entries regardless of the alphabet.

use crate::bit_reader::BitReader;
use crate::error::{InflateError, InflateResult};

/// Longest code length DEFLATE permits.
pub const MAX_CODE_LENGTH: usize = 15;

/// Canonical Huffman decoding table.
pub struct HuffmanTable {
    /// Number of codes of each length.
    count: [u16; MAX_CODE_LENGTH + 1],
    /// First (lowest) code value of each length.
    first_code: [u32; MAX_CODE_LENGTH + 1],
    /// Index into `symbols` of the first symbol of each length.
    offset: [u16; MAX_CODE_LENGTH + 1],
    /// Symbols sorted by (code length, symbol value).
    symbols: Vec<u16>,
    min_len: u8,
    max_len: u8,
}

impl HuffmanTable {
    /// Build a table from per-symbol code lengths.
    ///
    /// Fails with `InvalidCodeLength` when the lengths oversubscribe the
    /// code space (Kraft inequality violated). Incomplete codes are
    /// accepted; their unassigned codes decode as `SymbolNotFound`. An
    /// all-zero vector builds an empty table, which a literal-only dynamic
    /// block legitimately produces for its distance alphabet.
    pub fn from_lengths(lengths: &[u8]) -> InflateResult<Self> {
        let mut count = [0u16; MAX_CODE_LENGTH + 1];
        for &len in lengths {
            if len as usize > MAX_CODE_LENGTH {
                return Err(InflateError::InvalidCodeLength);
            }
            if len > 0 {
                count[len as usize] += 1;
            }
        }

        let max_len = (1..=MAX_CODE_LENGTH)
            .rev()
            .find(|&len| count[len] > 0)
            .unwrap_or(0) as u8;
        let min_len = (1..=MAX_CODE_LENGTH)
            .find(|&len| count[len] > 0)
            .unwrap_or(0) as u8;

        // Oversubscription check: the code space must not go negative.
        let mut available = 1i32;
        for len in 1..=max_len as usize {
            available = (available << 1) - count[len] as i32;
            if available < 0 {
                return Err(InflateError::InvalidCodeLength);
            }
        }

        // First code of each length, then symbol offsets in (length, symbol)
        // order.
        let mut first_code = [0u32; MAX_CODE_LENGTH + 1];
        let mut offset = [0u16; MAX_CODE_LENGTH + 1];
        let mut code = 0u32;
        for len in 1..=max_len as usize {
            code = (code + count[len - 1] as u32) << 1;
            first_code[len] = code;
            offset[len] = offset[len - 1] + count[len - 1];
        }

        let total: usize = count.iter().map(|&c| c as usize).sum();
        let mut symbols = vec![0u16; total];
        let mut next = offset;
        for (symbol, &len) in lengths.iter().enumerate() {
            if len > 0 {
                symbols[next[len as usize] as usize] = symbol as u16;
                next[len as usize] += 1;
            }
        }

        Ok(Self {
            count,
            first_code,
            offset,
            symbols,
            min_len,
            max_len,
        })
    }

    /// Shortest assigned code length (0 for an empty table).
    #[inline]
    pub fn min_code_length(&self) -> u8 {
        self.min_len
    }

    /// Longest assigned code length (0 for an empty table).
    #[inline]
    pub fn max_code_length(&self) -> u8 {
        self.max_len
    }

    /// Decode one symbol: accumulate bits MSB-first and return on the first
    /// (code, length) hit. Fails with `SymbolNotFound` once `max_len` bits
    /// have accumulated without a match.
    pub fn decode(&self, reader: &mut BitReader) -> InflateResult<u16> {
        let min = self.min_code_length() as usize;
        let max = self.max_code_length() as usize;
        if max == 0 {
            return Err(InflateError::SymbolNotFound);
        }

        // No code is shorter than min_len, so that many bits can be taken
        // in one gulp before the first lookup.
        let mut code = reader.read_bits_reversed(self.min_len)?;
        for len in min..=max {
            let count = self.count[len] as u32;
            if count > 0 && code >= self.first_code[len] && code - self.first_code[len] < count {
                let index = self.offset[len] as u32 + (code - self.first_code[len]);
                return Ok(self.symbols[index as usize]);
            }
            if len < max {
                code = (code << 1) | reader.read_bit()? as u32;
            }
        }
        Err(InflateError::SymbolNotFound)
    }
}

/// Fixed literal/length table (RFC 1951 §3.2.6): lengths 8 for 0-143,
/// 9 for 144-255, 7 for 256-279, 8 for 280-287.
pub fn fixed_litlen_table() -> HuffmanTable {
    let mut lengths = [0u8; 288];
    lengths[0..144].fill(8);
    lengths[144..256].fill(9);
    lengths[256..280].fill(7);
    lengths[280..288].fill(8);
    HuffmanTable::from_lengths(&lengths).unwrap()
}

/// Fixed distance table: all 32 codes are 5 bits. Codes 30 and 31 exist in
/// the code space but are reserved; the block decoder rejects them.
pub fn fixed_distance_table() -> HuffmanTable {
    HuffmanTable::from_lengths(&[5u8; 32]).unwrap()
}
