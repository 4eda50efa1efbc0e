//! Recorded drawing commands for one frame

use crate::color::Hsl;
use crate::painter::Painter;
use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    SetColor(Hsl),
    StrokeCircle { center: Vec2, radius: f32 },
    StrokeLine { from: Vec2, to: Vec2 },
    FillText { text: String, at: Vec2, font_px: f32 },
}

/// A [`Painter`] that records instead of drawing.
///
/// `clear` drops everything recorded so far, so a list reused across frames
/// only ever holds the latest frame.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of circles stroked, one per drawn record.
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeCircle { .. }))
            .count()
    }
}

impl Painter for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn set_color(&mut self, color: Hsl) {
        self.commands.push(DrawCommand::SetColor(color));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32) {
        self.commands
            .push(DrawCommand::StrokeCircle { center, radius });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2) {
        self.commands.push(DrawCommand::StrokeLine { from, to });
    }

    fn fill_text(&mut self, text: &str, at: Vec2, font_px: f32) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_owned(),
            at,
            font_px,
        });
    }
}
