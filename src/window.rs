//! Sliding window for LZ77 back-references.
//!
//! The window is a fixed-size circular buffer holding the most recently
//! emitted bytes. A back-reference of distance `d` is only valid while `d`
//! positions of real history exist, so the fill count is tracked alongside
//! the write cursor. Seeding with a preset dictionary counts as history.

use crate::error::{InflateError, InflateResult};

/// Window sizes a stream may request. All are powers of two, which lets the
/// cursor arithmetic use masking.
pub const SUPPORTED_WINDOW_SIZES: [usize; 8] =
    [256, 512, 1024, 2048, 4096, 8192, 16384, 32768];

/// Maximum back-reference length
pub const MAX_MATCH_LENGTH: usize = 258;

/// Circular history buffer for LZ77 decoding
pub struct SlidingWindow {
    buffer: Vec<u8>,
    mask: usize,
    pos: usize,
    fill: usize,
}

impl SlidingWindow {
    /// Create a window of `size` bytes. `size` must be one of
    /// [`SUPPORTED_WINDOW_SIZES`]; the stream driver validates it first.
    pub fn new(size: usize) -> Self {
        debug_assert!(size.is_power_of_two());
        Self {
            buffer: vec![0u8; size],
            mask: size - 1,
            pos: 0,
            fill: 0,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes of valid history currently held.
    #[inline]
    pub fn fill(&self) -> usize {
        self.fill
    }

    /// Pre-populate the window with a preset dictionary. Used once, before
    /// any block is decoded. The dictionary becomes back-reference history
    /// but is not part of the decoded output.
    pub fn seed(&mut self, preset: &[u8]) -> InflateResult<()> {
        let size = self.size();
        if preset.len() > size {
            return Err(InflateError::InvalidDictionarySize {
                dictionary: preset.len(),
                window: size,
            });
        }
        self.buffer[..preset.len()].copy_from_slice(preset);
        self.pos = preset.len() & self.mask;
        self.fill = preset.len();
        Ok(())
    }

    /// Emit one literal byte to the output and record it as history.
    #[inline]
    pub fn push(&mut self, byte: u8, output: &mut Vec<u8>) {
        self.buffer[self.pos] = byte;
        self.pos = (self.pos + 1) & self.mask;
        self.fill = (self.fill + 1).min(self.size());
        output.push(byte);
    }

    /// Resolve a back-reference: emit `length` bytes starting `distance`
    /// bytes behind the cursor, writing each emitted byte back into the
    /// window as it goes. `length` may exceed `distance`, in which case
    /// bytes written earlier in this same match are re-read (the
    /// run-length case), so the copy must proceed byte by byte.
    pub fn copy_match(
        &mut self,
        length: usize,
        distance: usize,
        output: &mut Vec<u8>,
    ) -> InflateResult<()> {
        if distance == 0 || distance > self.size() || distance > self.fill() {
            return Err(InflateError::InvalidDistance(distance));
        }
        if length > MAX_MATCH_LENGTH {
            return Err(InflateError::InvalidLength(length));
        }

        let mut src = (self.pos + self.size() - distance) & self.mask;
        for _ in 0..length {
            let byte = self.buffer[src];
            src = (src + 1) & self.mask;
            self.buffer[self.pos] = byte;
            self.pos = (self.pos + 1) & self.mask;
            output.push(byte);
        }
        self.fill = (self.fill + length).min(self.size());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_advances_cursor_and_fill() {
        let mut window = SlidingWindow::new(256);
        let mut output = Vec::new();

        window.push(b'a', &mut output);
        window.push(b'b', &mut output);

        assert_eq!(output, b"ab");
        assert_eq!(window.fill(), 2);
    }

    #[test]
    fn test_fill_saturates_at_window_size() {
        let mut window = SlidingWindow::new(256);
        let mut output = Vec::new();

        for i in 0..600 {
            window.push((i % 256) as u8, &mut output);
        }

        assert_eq!(window.fill(), 256);
        assert_eq!(output.len(), 600);
    }

    #[test]
    fn test_copy_match_simple() {
        let mut window = SlidingWindow::new(256);
        let mut output = Vec::new();

        for &b in b"abc" {
            window.push(b, &mut output);
        }
        window.copy_match(3, 3, &mut output).unwrap();

        assert_eq!(output, b"abcabc");
    }

    #[test]
    fn test_copy_match_overlapping_run() {
        let mut window = SlidingWindow::new(256);
        let mut output = Vec::new();

        window.push(b'x', &mut output);
        window.copy_match(10, 1, &mut output).unwrap();

        assert_eq!(output, b"xxxxxxxxxxx");
    }

    #[test]
    fn test_copy_match_max_length_run() {
        let mut window = SlidingWindow::new(256);
        let mut output = Vec::new();

        window.push(b'z', &mut output);
        window.copy_match(MAX_MATCH_LENGTH, 1, &mut output).unwrap();

        assert_eq!(output.len(), 259);
        assert!(output.iter().all(|&b| b == b'z'));
    }

    #[test]
    fn test_copy_match_spanning_wrap_point() {
        let mut window = SlidingWindow::new(256);
        let mut output = Vec::new();

        // Fill past the wrap point so the source range straddles it.
        for i in 0..300 {
            window.push((i % 251) as u8, &mut output);
        }
        window.copy_match(10, 50, &mut output).unwrap();

        let expected: Vec<u8> = (250..260).map(|i| (i % 251) as u8).collect();
        assert_eq!(&output[300..], &expected[..]);
    }

    #[test]
    fn test_distance_beyond_fill_rejected() {
        let mut window = SlidingWindow::new(256);
        let mut output = Vec::new();

        window.push(b'a', &mut output);
        assert_eq!(
            window.copy_match(3, 4, &mut output),
            Err(InflateError::InvalidDistance(4))
        );
    }

    #[test]
    fn test_distance_beyond_window_rejected() {
        let mut window = SlidingWindow::new(256);
        let mut output = Vec::new();

        for i in 0..300 {
            window.push(i as u8, &mut output);
        }
        assert_eq!(
            window.copy_match(3, 257, &mut output),
            Err(InflateError::InvalidDistance(257))
        );
    }

    #[test]
    fn test_overlong_match_rejected() {
        let mut window = SlidingWindow::new(256);
        let mut output = Vec::new();

        window.push(b'a', &mut output);
        assert_eq!(
            window.copy_match(259, 1, &mut output),
            Err(InflateError::InvalidLength(259))
        );
    }

    #[test]
    fn test_seed_sets_cursor_and_fill() {
        let mut window = SlidingWindow::new(256);
        window.seed(b"abc").unwrap();

        assert_eq!(window.fill(), 3);

        let mut output = Vec::new();
        window.copy_match(3, 3, &mut output).unwrap();
        assert_eq!(output, b"abc");
    }

    #[test]
    fn test_seed_of_exactly_window_size_wraps_cursor() {
        let mut window = SlidingWindow::new(256);
        let preset: Vec<u8> = (0..=255).collect();
        window.seed(&preset).unwrap();

        assert_eq!(window.fill(), 256);

        // Distance 256 reaches the oldest seeded byte.
        let mut output = Vec::new();
        window.copy_match(2, 256, &mut output).unwrap();
        assert_eq!(output, &[0, 1]);
    }

    #[test]
    fn test_oversized_seed_rejected() {
        let mut window = SlidingWindow::new(256);
        let preset = vec![0u8; 257];

        assert_eq!(
            window.seed(&preset),
            Err(InflateError::InvalidDictionarySize {
                dictionary: 257,
                window: 256,
            })
        );
    }
}
