//! Seven-segment stroke digits
//!
//! Labels are tier numbers, so digits are all the text we ever draw.

use glam::Vec2;

/// Cap height as a fraction of the font size.
const CAP_HEIGHT: f32 = 0.7;
/// Glyph width as a fraction of cap height.
const ASPECT: f32 = 0.5;
/// Advance between glyph centers as a fraction of glyph width.
const ADVANCE: f32 = 1.6;

// Segment endpoints in a unit cell centered on the origin, y down:
// x in [-0.5, 0.5], y in [-1, 1].
const A: (Vec2, Vec2) = (Vec2::new(-0.5, -1.0), Vec2::new(0.5, -1.0));
const B: (Vec2, Vec2) = (Vec2::new(0.5, -1.0), Vec2::new(0.5, 0.0));
const C: (Vec2, Vec2) = (Vec2::new(0.5, 0.0), Vec2::new(0.5, 1.0));
const D: (Vec2, Vec2) = (Vec2::new(-0.5, 1.0), Vec2::new(0.5, 1.0));
const E: (Vec2, Vec2) = (Vec2::new(-0.5, 0.0), Vec2::new(-0.5, 1.0));
const F: (Vec2, Vec2) = (Vec2::new(-0.5, -1.0), Vec2::new(-0.5, 0.0));
const G: (Vec2, Vec2) = (Vec2::new(-0.5, 0.0), Vec2::new(0.5, 0.0));

const DIGITS: [&[(Vec2, Vec2)]; 10] = [
    &[A, B, C, D, E, F],
    &[B, C],
    &[A, B, G, E, D],
    &[A, B, G, C, D],
    &[F, G, B, C],
    &[A, F, G, C, D],
    &[A, F, G, E, D, C],
    &[A, B, C],
    &[A, B, C, D, E, F, G],
    &[A, B, C, D, F, G],
];

/// Unit-cell segments for `ch`, empty for anything but an ASCII digit.
pub fn segments(ch: char) -> &'static [(Vec2, Vec2)] {
    match ch.to_digit(10) {
        Some(digit) => DIGITS[digit as usize],
        None => &[],
    }
}

/// Stroke width for text at `font_px`.
pub fn stroke_width(font_px: f32) -> f32 {
    (font_px / 8.0).max(1.0)
}

/// Line segments spelling `text`, centered on `at`.
pub fn text_strokes(text: &str, at: Vec2, font_px: f32) -> Vec<(Vec2, Vec2)> {
    let height = font_px * CAP_HEIGHT;
    let width = height * ASPECT;
    let advance = width * ADVANCE;
    let glyphs = text.chars().count();
    if glyphs == 0 {
        return Vec::new();
    }

    let half_cell = Vec2::new(width, height / 2.0);
    let first = at.x - advance * (glyphs - 1) as f32 / 2.0;

    text.chars()
        .enumerate()
        .flat_map(|(i, ch)| {
            let center = Vec2::new(first + advance * i as f32, at.y);
            segments(ch)
                .iter()
                .map(move |&(a, b)| (center + a * half_cell, center + b * half_cell))
        })
        .collect()
}
