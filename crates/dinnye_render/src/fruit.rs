//! Record to picture mapping
//!
//! Each record becomes a stroked circle in its tier's hue, rotated by its
//! orientation, with a tick from the label edge to the rim so the rotation
//! is visible. Tiers above the first two carry a number.

use crate::color::Hsl;
use crate::painter::Painter;
use dinnye_core::{DecodedFrame, FruitRecord, WorldExtent};
use glam::Vec2;

#[derive(Debug, Clone, Copy)]
pub struct FruitRenderer {
    /// Output pixels per world unit.
    scale: f32,
}

impl FruitRenderer {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    /// Fit `extent` into a square output of `output_size` pixels.
    pub fn fitted(extent: WorldExtent, output_size: f32) -> Self {
        Self::new(extent.scale_for(output_size))
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    /// Clear the surface and draw every record; the preview goes last so it
    /// sits on top.
    pub fn draw_frame(&self, painter: &mut impl Painter, frame: &DecodedFrame) {
        painter.clear();
        for record in frame.iter() {
            self.draw_record(painter, record);
        }
    }

    pub fn draw_record(&self, painter: &mut impl Painter, record: &FruitRecord) {
        let radius = record.radius * self.scale;
        let font_px = record.font_size_px();

        painter.set_color(Hsl::vivid(record.hue_degrees() as f32));
        painter.save();
        painter.translate(record.position * self.scale);
        painter.rotate(record.rotation_radians());

        if let Some(label) = record.label() {
            painter.fill_text(&label, Vec2::ZERO, font_px);
        }
        painter.stroke_circle(Vec2::ZERO, radius);
        painter.stroke_line(Vec2::new(0.0, -font_px / 2.0), Vec2::new(0.0, -radius));

        painter.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw_list::{DrawCommand, DrawList};

    fn record(x: f32, y: f32, radius: f32, orientation: u32, size_index: u32) -> FruitRecord {
        FruitRecord {
            position: Vec2::new(x, y),
            previous: Vec2::new(x, y),
            radius,
            orientation,
            size_index,
        }
    }

    #[test]
    fn small_tier_draws_unlabeled_rotated_circle() {
        let renderer = FruitRenderer::new(10.0);
        let mut list = DrawList::new();
        renderer.draw_record(&mut list, &record(1.0, 2.0, 0.5, 16384, 1));

        let commands = list.commands();
        assert_eq!(commands[0], DrawCommand::SetColor(Hsl::vivid(30.0)));
        assert_eq!(commands[1], DrawCommand::Save);
        assert_eq!(commands[2], DrawCommand::Translate(Vec2::new(10.0, 20.0)));
        match commands[3] {
            DrawCommand::Rotate(angle) => {
                assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6)
            }
            ref other => panic!("expected rotation, got {other:?}"),
        }
        assert_eq!(
            commands[4],
            DrawCommand::StrokeCircle {
                center: Vec2::ZERO,
                radius: 5.0
            }
        );
        // Unlabeled, so the tick starts at the center.
        assert_eq!(
            commands[5],
            DrawCommand::StrokeLine {
                from: Vec2::ZERO,
                to: Vec2::new(0.0, -5.0)
            }
        );
        assert_eq!(commands[6], DrawCommand::Restore);
        assert_eq!(commands.len(), 7);
    }

    #[test]
    fn large_tier_is_labeled_one_based() {
        let renderer = FruitRenderer::new(1.0);
        let mut list = DrawList::new();
        renderer.draw_record(&mut list, &record(0.0, 0.0, 40.0, 0, 4));

        assert!(list.commands().contains(&DrawCommand::FillText {
            text: "5".into(),
            at: Vec2::ZERO,
            font_px: 18.0,
        }));
        assert_eq!(list.commands()[0], DrawCommand::SetColor(Hsl::vivid(120.0)));
    }

    #[test]
    fn labeled_tick_starts_at_label_edge() {
        let renderer = FruitRenderer::new(1.0);
        let mut list = DrawList::new();
        renderer.draw_record(&mut list, &record(0.0, 0.0, 40.0, 0, 3));

        // font = 3 * 2 + 10
        assert!(list.commands().contains(&DrawCommand::StrokeLine {
            from: Vec2::new(0.0, -8.0),
            to: Vec2::new(0.0, -40.0),
        }));
    }

    #[test]
    fn preview_drawn_after_live_records() {
        let renderer = FruitRenderer::new(2.0);
        let frame = DecodedFrame {
            live: vec![record(1.0, 1.0, 1.0, 0, 0), record(2.0, 1.0, 1.0, 0, 0)],
            preview: Some(record(9.0, 0.0, 3.0, 0, 0)),
        };
        let mut list = DrawList::new();
        renderer.draw_frame(&mut list, &frame);

        assert_eq!(list.commands()[0], DrawCommand::Clear);
        let radii: Vec<f32> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokeCircle { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![2.0, 2.0, 6.0]);
    }

    #[test]
    fn fitted_scale_places_world_point() {
        let renderer = FruitRenderer::fitted(WorldExtent::new(100.0, 50.0), 720.0);
        assert!((renderer.scale() - 7.2).abs() < 1e-5);

        let mut list = DrawList::new();
        renderer.draw_record(&mut list, &record(10.0, 10.0, 1.0, 0, 0));
        match list.commands()[2] {
            DrawCommand::Translate(at) => assert!((at - Vec2::new(72.0, 72.0)).length() < 1e-3),
            ref other => panic!("expected translation, got {other:?}"),
        }
    }
}
