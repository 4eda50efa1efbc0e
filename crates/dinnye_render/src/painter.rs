//! Output sink for drawing
//!
//! A small 2D-canvas-style surface: a transform stack, a current colour, and
//! stroke/text primitives. Coordinates are output pixels, y pointing down.

use crate::color::Hsl;
use glam::Vec2;

pub trait Painter {
    /// Wipe the whole surface.
    fn clear(&mut self);

    /// Push the current transform.
    fn save(&mut self);

    /// Pop back to the last saved transform.
    fn restore(&mut self);

    fn translate(&mut self, offset: Vec2);

    /// Rotate subsequent drawing by `radians` (clockwise on screen).
    fn rotate(&mut self, radians: f32);

    /// Colour for both strokes and text.
    fn set_color(&mut self, color: Hsl);

    fn stroke_circle(&mut self, center: Vec2, radius: f32);

    fn stroke_line(&mut self, from: Vec2, to: Vec2);

    /// Draw `text` centered on `at`.
    fn fill_text(&mut self, text: &str, at: Vec2, font_px: f32);
}
