//! rinflate - DEFLATE decompression with Adler-32 verification
//!
//! A decoder for raw DEFLATE (RFC 1951) streams that carry a trailing
//! big-endian Adler-32 checksum, i.e. a zlib stream with its 2-byte header
//! already stripped. The decoder supports all three block types (stored,
//! fixed Huffman, dynamic Huffman), bounded sliding windows from 256 bytes
//! to 32 KB, and an optional preset dictionary that pre-populates the
//! window history.
//!
//! Decoding is a pure function over the input buffer: no I/O, no threads,
//! no shared state. Either the whole stream inflates and verifies, or a
//! structured [`InflateError`] comes back and no output escapes.
//!
//! # Example
//!
//! ```
//! use rinflate::inflate;
//!
//! // A stored block holding "Hello", an empty final block, and the
//! // big-endian Adler-32 of the inflated bytes.
//! let stream = [
//!     0x00, 0x05, 0x00, 0xFA, 0xFF, b'H', b'e', b'l', b'l', b'o',
//!     0x01, 0x00, 0x00, 0xFF, 0xFF,
//!     0x05, 0x8C, 0x01, 0xF5,
//! ];
//!
//! let output = inflate(&stream, None, 32 * 1024).unwrap();
//! assert_eq!(output, b"Hello");
//! ```

mod adler32;
mod bit_reader;
mod decoder;
mod error;
mod huffman;
mod test_utils;
mod window;


pub use adler32::adler32;
pub use error::{InflateError, InflateResult};
pub use window::{MAX_MATCH_LENGTH, SUPPORTED_WINDOW_SIZES};

/// Inflate a DEFLATE stream and verify its Adler-32 trailer.
///
/// `compressed` must start at the first block header and end with the
/// 4-byte big-endian checksum of the inflated data. `window_size` must be
/// one of [`SUPPORTED_WINDOW_SIZES`]. A `dictionary`, when supplied, seeds
/// the window history for back-references but is neither emitted nor
/// covered by the checksum.
///
/// On success the inflated bytes are returned as a freshly allocated
/// vector; any failure surfaces immediately as an [`InflateError`].
pub fn inflate(
    compressed: &[u8],
    dictionary: Option<&[u8]>,
    window_size: usize,
) -> InflateResult<Vec<u8>> {
    decoder::Inflater::new(compressed, dictionary, window_size)?.run()
}
