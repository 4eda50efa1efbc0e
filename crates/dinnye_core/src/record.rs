//! Decoded per-object record
//!
//! Records are recomputed every frame from the arena and never stored.

use crate::error::DecodeError;
use crate::layout::{RecordLayout, ROTATION_MASK, ROTATION_STEPS, WORD_BYTES};
use glam::Vec2;
use std::f32::consts::TAU;

/// Degrees of hue between consecutive size tiers.
pub const HUE_STEP_DEGREES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FruitRecord {
    /// Current center (world units).
    pub position: Vec2,
    /// Reference position used for the drawn offset indicator.
    pub previous: Vec2,
    /// Draw radius (world units).
    pub radius: f32,
    /// Raw packed orientation word.
    pub orientation: u32,
    /// Size tier ordinal.
    pub size_index: u32,
}

impl FruitRecord {
    /// Decode the record starting at byte `offset` of `arena`.
    pub fn read(arena: &[u8], offset: usize, layout: &RecordLayout) -> Result<Self, DecodeError> {
        let len = layout.stride_bytes();
        let bytes = offset
            .checked_add(len)
            .and_then(|end| arena.get(offset..end))
            .ok_or(DecodeError::OutOfBounds {
                offset,
                len,
                arena_len: arena.len(),
            })?;

        let f = |word: usize| f32::from_bits(read_word(bytes, word));
        Ok(Self {
            position: Vec2::new(f(layout.x), f(layout.y)),
            previous: Vec2::new(f(layout.prev_x), f(layout.prev_y)),
            radius: f(layout.radius),
            orientation: layout.orientation.map_or(0, |w| read_word(bytes, w)),
            size_index: layout.size_index.map_or(0, |w| read_word(bytes, w)),
        })
    }

    /// Quantized angle, `[0, 65536)` covering one full turn.
    #[inline]
    pub fn rotation_steps(&self) -> u32 {
        self.orientation & ROTATION_MASK
    }

    #[inline]
    pub fn rotation_radians(&self) -> f32 {
        self.rotation_steps() as f32 / ROTATION_STEPS * TAU
    }

    /// Hue in degrees, `[0, 360)`.
    #[inline]
    pub fn hue_degrees(&self) -> u32 {
        (u64::from(self.size_index) * u64::from(HUE_STEP_DEGREES) % 360) as u32
    }

    /// Tiers 0 and 1 are unlabeled; higher tiers show their 1-based number.
    pub fn label(&self) -> Option<String> {
        (self.size_index > 1).then(|| (u64::from(self.size_index) + 1).to_string())
    }

    /// Label font size in pixels, 0 when unlabeled.
    #[inline]
    pub fn font_size_px(&self) -> f32 {
        if self.size_index > 1 {
            self.size_index as f32 * 2.0 + 10.0
        } else {
            0.0
        }
    }
}

#[inline]
fn read_word(bytes: &[u8], word: usize) -> u32 {
    let at = word * WORD_BYTES;
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn with_tier(size_index: u32) -> FruitRecord {
        FruitRecord {
            position: Vec2::ZERO,
            previous: Vec2::ZERO,
            radius: 1.0,
            orientation: 0,
            size_index,
        }
    }

    #[test]
    fn hue_steps_thirty_degrees() {
        assert_eq!(with_tier(0).hue_degrees(), 0);
        assert_eq!(with_tier(5).hue_degrees(), 150);
        assert_eq!(with_tier(12).hue_degrees(), 0);
        assert_eq!(with_tier(13).hue_degrees(), 30);
        assert_eq!(with_tier(u32::MAX).hue_degrees(), ((u32::MAX as u64 * 30) % 360) as u32);
    }

    #[test]
    fn label_only_above_tier_one() {
        assert_eq!(with_tier(0).label(), None);
        assert_eq!(with_tier(1).label(), None);
        assert_eq!(with_tier(2).label().as_deref(), Some("3"));
        assert_eq!(with_tier(10).label().as_deref(), Some("11"));
        assert_eq!(with_tier(1).font_size_px(), 0.0);
        assert_eq!(with_tier(2).font_size_px(), 14.0);
    }

    #[test]
    fn rotation_uses_low_sixteen_bits() {
        let mut record = with_tier(0);
        assert_eq!(record.rotation_radians(), 0.0);

        record.orientation = 16384;
        assert!((record.rotation_radians() - FRAC_PI_2).abs() < 1e-6);

        // Reserved high bits are ignored.
        record.orientation = 0xABCD_0000 | 16384;
        assert_eq!(record.rotation_steps(), 16384);
    }

    #[test]
    fn read_reports_out_of_bounds() {
        let arena = vec![0u8; 40];
        let err = FruitRecord::read(&arena, 0, &RecordLayout::CANONICAL).unwrap_err();
        assert_eq!(
            err,
            DecodeError::OutOfBounds {
                offset: 0,
                len: 44,
                arena_len: 40
            }
        );
        assert!(FruitRecord::read(&arena, usize::MAX, &RecordLayout::CANONICAL).is_err());
    }

    #[test]
    fn six_word_records_decode_untagged() {
        let mut arena = vec![0u8; 24];
        arena[16..20].copy_from_slice(&2.5f32.to_le_bytes());
        let layout = RecordLayout::for_stride(6).unwrap();
        let record = FruitRecord::read(&arena, 0, &layout).unwrap();
        assert_eq!(record.radius, 2.5);
        assert_eq!(record.size_index, 0);
        assert_eq!(record.orientation, 0);
    }
}
