//! Record byte layout shared by host and module
//!
//! Each live object is one fixed-stride run of little-endian 32-bit words.
//! Canonical layout (word offsets):
//!
//! | word | field                                            |
//! |------|--------------------------------------------------|
//! | 0, 1 | x, y (f32)                                       |
//! | 2, 3 | prevX, prevY (f32)                               |
//! | 4    | radius (f32)                                     |
//! | 5    | reserved (f32)                                   |
//! | 6    | packed orientation: low 16 bits = angle, rest reserved |
//! | 7    | sizeIndex (u32)                                  |
//! | 8-10 | reserved                                         |
//!
//! Older module builds use 8 words (no trailing reserve) or 6 words (no
//! orientation or size tier at all). The stride is a property of the module
//! build and is resolved once at load time, never assumed.

/// Bytes per layout word.
pub const WORD_BYTES: usize = 4;

/// Mask selecting the quantized angle from the packed orientation word.
pub const ROTATION_MASK: u32 = 0xFFFF;

/// Quantization steps in one full turn.
pub const ROTATION_STEPS: f32 = 65536.0;

/// Smallest stride that still carries position and radius.
pub const MIN_STRIDE_WORDS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    stride_words: usize,
    pub x: usize,
    pub y: usize,
    pub prev_x: usize,
    pub prev_y: usize,
    pub radius: usize,
    pub orientation: Option<usize>,
    pub size_index: Option<usize>,
}

impl RecordLayout {
    /// Canonical 11-word layout.
    pub const CANONICAL: RecordLayout = RecordLayout {
        stride_words: 11,
        x: 0,
        y: 1,
        prev_x: 2,
        prev_y: 3,
        radius: 4,
        orientation: Some(6),
        size_index: Some(7),
    };

    /// Layout for a module declaring `stride_words` words per record.
    ///
    /// Returns `None` when the stride is too small to hold a drawable record.
    pub fn for_stride(stride_words: usize) -> Option<Self> {
        if stride_words < MIN_STRIDE_WORDS {
            return None;
        }
        let tagged = stride_words >= 8;
        Some(Self {
            stride_words,
            orientation: tagged.then_some(6),
            size_index: tagged.then_some(7),
            ..Self::CANONICAL
        })
    }

    #[inline]
    pub fn stride_words(&self) -> usize {
        self.stride_words
    }

    #[inline]
    pub fn stride_bytes(&self) -> usize {
        self.stride_words * WORD_BYTES
    }
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self::CANONICAL
    }
}
