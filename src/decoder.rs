//! DEFLATE block decoding and the stream driver.
//!
//! A stream is a sequence of blocks, each tagged with a final-block flag and
//! a 2-bit type: stored, fixed-Huffman, or dynamic-Huffman. Compressed
//! blocks share one body loop that turns literal/length and distance symbols
//! into window writes; the driver iterates blocks until the final flag and
//! then checks the big-endian Adler-32 trailer against the inflated output.

use crate::adler32::adler32;
use crate::bit_reader::BitReader;
use crate::error::{InflateError, InflateResult};
use crate::huffman::{fixed_distance_table, fixed_litlen_table, HuffmanTable};
use crate::window::{SlidingWindow, SUPPORTED_WINDOW_SIZES};

/// End of block symbol
const END_OF_BLOCK: u16 = 256;

/// Highest valid literal/length symbol; 286 and 287 are reserved.
const MAX_LITLEN_SYMBOL: u16 = 285;

/// First reserved distance symbol; 30 and 31 never appear in valid streams.
const NUM_DIST_SYMBOLS: u16 = 30;

/// Base lengths for length codes 257..=285
static LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Extra bits for length codes 257..=285
static LENGTH_EXTRA_BITS: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Base distances for distance codes 0..=29
static DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits for distance codes 0..=29
static DISTANCE_EXTRA_BITS: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Transmission order of the code-length alphabet in a dynamic header
static CODELEN_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Single-use decoder for one DEFLATE stream.
pub(crate) struct Inflater<'a> {
    reader: BitReader<'a>,
    window: SlidingWindow,
    output: Vec<u8>,
}

impl<'a> Inflater<'a> {
    /// Validate the window size, allocate the window, and seed the preset
    /// dictionary if one was supplied.
    pub(crate) fn new(
        data: &'a [u8],
        dictionary: Option<&[u8]>,
        window_size: usize,
    ) -> InflateResult<Self> {
        if !SUPPORTED_WINDOW_SIZES.contains(&window_size) {
            return Err(InflateError::InvalidWindowSize(window_size));
        }

        let mut window = SlidingWindow::new(window_size);
        if let Some(preset) = dictionary {
            window.seed(preset)?;
        }

        Ok(Self {
            reader: BitReader::new(data),
            window,
            output: Vec::new(),
        })
    }

    /// Decode blocks until the final-block flag, verify the Adler-32
    /// trailer, and hand the inflated bytes to the caller.
    pub(crate) fn run(mut self) -> InflateResult<Vec<u8>> {
        loop {
            let bfinal = self.reader.read_bit()?;
            let btype = self.reader.read_bits(2)? as u8;

            match btype {
                0 => self.decode_stored_block()?,
                1 => self.decode_fixed_block()?,
                2 => self.decode_dynamic_block()?,
                _ => return Err(InflateError::ReservedBlock),
            }

            if bfinal == 1 {
                break;
            }
        }

        self.verify_trailer()?;
        Ok(self.output)
    }

    /// Stored block (BTYPE=00): byte-align, LEN/NLEN one's-complement pair,
    /// then LEN verbatim bytes which still enter the window as history.
    fn decode_stored_block(&mut self) -> InflateResult<()> {
        self.reader.align_to_byte();

        let len = self.reader.read_u16_le()?;
        let nlen = self.reader.read_u16_le()?;
        if len != !nlen {
            return Err(InflateError::UncompressedLengthMismatch { len, nlen });
        }

        let bytes = self.reader.peek_bytes(len as usize)?;
        self.reader.skip_bytes(len as usize)?;
        for &byte in bytes {
            self.window.push(byte, &mut self.output);
        }

        Ok(())
    }

    /// Fixed-Huffman block (BTYPE=01).
    fn decode_fixed_block(&mut self) -> InflateResult<()> {
        let litlen_table = fixed_litlen_table();
        let dist_table = fixed_distance_table();
        self.decode_huffman_block(&litlen_table, &dist_table)
    }

    /// Dynamic-Huffman block (BTYPE=10): read the code-length alphabet,
    /// expand the transmitted code lengths, build both tables, then run the
    /// shared body loop. All table scratch dies with this call.
    fn decode_dynamic_block(&mut self) -> InflateResult<()> {
        let hlit = self.reader.read_bits(5)? as usize + 257;
        let hdist = self.reader.read_bits(5)? as usize + 1;
        let hclen = self.reader.read_bits(4)? as usize + 4;

        let mut codelen_lengths = [0u8; 19];
        for &symbol in CODELEN_ORDER.iter().take(hclen) {
            codelen_lengths[symbol] = self.reader.read_bits(3)? as u8;
        }
        let codelen_table = HuffmanTable::from_lengths(&codelen_lengths)?;

        let lengths = self.read_code_lengths(&codelen_table, hlit + hdist)?;
        let litlen_table = HuffmanTable::from_lengths(&lengths[..hlit])?;
        let dist_table = HuffmanTable::from_lengths(&lengths[hlit..])?;

        self.decode_huffman_block(&litlen_table, &dist_table)
    }

    /// Expand the code-length symbol sequence into exactly `total` bit
    /// lengths. Symbols 0-15 are literal lengths; 16 repeats the last
    /// emitted length 3-6 times, 17 and 18 emit runs of zeros. A repeat may
    /// straddle the literal/length-distance boundary but must not overrun
    /// the total.
    fn read_code_lengths(
        &mut self,
        codelen_table: &HuffmanTable,
        total: usize,
    ) -> InflateResult<Vec<u8>> {
        let mut lengths = Vec::with_capacity(total);

        while lengths.len() < total {
            let symbol = codelen_table.decode(&mut self.reader)?;
            match symbol {
                0..=15 => lengths.push(symbol as u8),
                16 => {
                    let previous = *lengths.last().ok_or(InflateError::InvalidRepeatCode)?;
                    let count = self.reader.read_bits(2)? as usize + 3;
                    if lengths.len() + count > total {
                        return Err(InflateError::InvalidLength(count));
                    }
                    for _ in 0..count {
                        lengths.push(previous);
                    }
                }
                17 => {
                    let count = self.reader.read_bits(3)? as usize + 3;
                    if lengths.len() + count > total {
                        return Err(InflateError::InvalidLength(count));
                    }
                    lengths.resize(lengths.len() + count, 0);
                }
                18 => {
                    let count = self.reader.read_bits(7)? as usize + 11;
                    if lengths.len() + count > total {
                        return Err(InflateError::InvalidLength(count));
                    }
                    lengths.resize(lengths.len() + count, 0);
                }
                _ => return Err(InflateError::SymbolNotFound),
            }
        }

        Ok(lengths)
    }

    /// Body loop shared by fixed and dynamic blocks: literals go straight
    /// to the window, length symbols pull a distance symbol and resolve a
    /// back-reference, 256 ends the block.
    fn decode_huffman_block(
        &mut self,
        litlen_table: &HuffmanTable,
        dist_table: &HuffmanTable,
    ) -> InflateResult<()> {
        loop {
            let symbol = litlen_table.decode(&mut self.reader)?;

            if symbol < END_OF_BLOCK {
                self.window.push(symbol as u8, &mut self.output);
                continue;
            }
            if symbol == END_OF_BLOCK {
                return Ok(());
            }
            if symbol > MAX_LITLEN_SYMBOL {
                return Err(InflateError::SymbolNotFound);
            }

            let index = (symbol - 257) as usize;
            let mut length = LENGTH_BASE[index] as usize;
            let extra = LENGTH_EXTRA_BITS[index];
            if extra > 0 {
                length += self.reader.read_bits(extra)? as usize;
            }

            let dist_symbol = dist_table.decode(&mut self.reader)?;
            if dist_symbol >= NUM_DIST_SYMBOLS {
                return Err(InflateError::InvalidDistanceSymbol(dist_symbol));
            }
            let index = dist_symbol as usize;
            let mut distance = DISTANCE_BASE[index] as usize;
            let extra = DISTANCE_EXTRA_BITS[index];
            if extra > 0 {
                distance += self.reader.read_bits(extra)? as usize;
            }

            self.window.copy_match(length, distance, &mut self.output)?;
        }
    }

    /// After the final block: byte-align, require exactly the 4 trailer
    /// bytes, and compare the stored big-endian Adler-32 against the
    /// checksum of the inflated output. A preset dictionary is history
    /// only; it is not covered by the checksum.
    fn verify_trailer(&mut self) -> InflateResult<()> {
        self.reader.align_to_byte();

        let remaining = self.reader.bytes_remaining();
        if remaining != 4 {
            return Err(InflateError::FinalBlockMisplaced { remaining });
        }

        let trailer = self.reader.peek_bytes(4)?;
        let stored = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
        self.reader.skip_bytes(4)?;

        let computed = adler32(&self.output);
        if computed != stored {
            return Err(InflateError::DataIntegrityFail { computed, stored });
        }

        Ok(())
    }
}
