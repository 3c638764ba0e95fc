use thiserror::Error;

/// Everything that can go wrong while inflating a DEFLATE stream.
///
/// Decoding is transactional: the first error aborts the call and no
/// partial output escapes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateError {
    #[error("bit cursor ran past the end of the compressed stream")]
    MemoryAccessFail,

    #[error("unsupported window size: {0}")]
    InvalidWindowSize(usize),

    #[error("preset dictionary of {dictionary} bytes exceeds the {window} byte window")]
    InvalidDictionarySize { dictionary: usize, window: usize },

    #[error("reserved block type")]
    ReservedBlock,

    #[error("stored block length {len:#06x} does not match complement {nlen:#06x}")]
    UncompressedLengthMismatch { len: u16, nlen: u16 },

    #[error("no Huffman code matched within the maximum code length")]
    SymbolNotFound,

    #[error("back-reference distance {0} exceeds the available history")]
    InvalidDistance(usize),

    #[error("reserved distance symbol {0}")]
    InvalidDistanceSymbol(u16),

    #[error("invalid length: {0}")]
    InvalidLength(usize),

    #[error("repeat code with no previous code length")]
    InvalidRepeatCode,

    #[error("code lengths oversubscribe the Huffman code space")]
    InvalidCodeLength,

    #[error("expected exactly 4 trailer bytes after the final block, found {remaining}")]
    FinalBlockMisplaced { remaining: usize },

    #[error("Adler-32 mismatch: computed {computed:#010x}, stored {stored:#010x}")]
    DataIntegrityFail { computed: u32, stored: u32 },
}

pub type InflateResult<T> = Result<T, InflateError>;
