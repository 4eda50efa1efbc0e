//! Per-frame record extraction
//!
//! Given the base address returned by `init`/`step`, the live object count and
//! an optional preview address, pull one [`FruitRecord`] per object out of the
//! arena plus the trailing preview record.

use crate::engine::Address;
use crate::error::DecodeError;
use crate::layout::RecordLayout;
use crate::record::FruitRecord;

/// Records decoded for one frame, in arena order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedFrame {
    pub live: Vec<FruitRecord>,
    pub preview: Option<FruitRecord>,
}

impl DecodedFrame {
    pub fn clear(&mut self) {
        self.live.clear();
        self.preview = None;
    }

    /// Total records to draw this frame.
    pub fn len(&self) -> usize {
        self.live.len() + usize::from(self.preview.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live records first, preview last.
    pub fn iter(&self) -> impl Iterator<Item = &FruitRecord> {
        self.live.iter().chain(self.preview.iter())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FrameDecoder {
    layout: RecordLayout,
}

impl FrameDecoder {
    pub fn new(layout: RecordLayout) -> Self {
        Self { layout }
    }

    #[inline]
    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// Bytes past `base` the frame addresses.
    ///
    /// Covers the live array and, when it lies at or after `base`, the
    /// preview record.
    pub fn span_bytes(&self, base: Address, count: usize, preview: Option<Address>) -> usize {
        let stride = self.layout.stride_bytes();
        let live = count.saturating_mul(stride);
        match preview.filter(|p| *p >= base) {
            Some(p) => live.max(p.offset() - base.offset() + stride),
            None => live,
        }
    }

    pub fn decode(
        &self,
        arena: &[u8],
        base: Address,
        count: usize,
        preview: Option<Address>,
    ) -> Result<DecodedFrame, DecodeError> {
        let mut frame = DecodedFrame::default();
        self.decode_into(arena, base, count, preview, &mut frame)?;
        Ok(frame)
    }

    /// Decode into `frame`, reusing its allocation.
    pub fn decode_into(
        &self,
        arena: &[u8],
        base: Address,
        count: usize,
        preview: Option<Address>,
        frame: &mut DecodedFrame,
    ) -> Result<(), DecodeError> {
        frame.clear();

        let span = self.span_bytes(base, count, preview);
        if base.offset().saturating_add(span) > arena.len() {
            return Err(DecodeError::OutOfBounds {
                offset: base.offset(),
                len: span,
                arena_len: arena.len(),
            });
        }

        let stride = self.layout.stride_bytes();
        frame.live.reserve(count);
        for i in 0..count {
            let offset = base.offset() + i * stride;
            frame.live.push(FruitRecord::read(arena, offset, &self.layout)?);
        }

        match preview {
            Some(p) if p >= base => {
                frame.preview = Some(FruitRecord::read(arena, p.offset(), &self.layout)?);
            }
            Some(p) => {
                tracing::trace!(preview = %p, base = %base, "preview before base, suppressed");
            }
            None => {}
        }

        Ok(())
    }
}
