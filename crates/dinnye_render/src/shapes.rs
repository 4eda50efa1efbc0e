//! Draw list tessellation
//!
//! Replays a [`DrawList`] against a transform stack and emits triangle-list
//! vertices. Strokes become rings and quads; text becomes stroked digits.

use crate::draw_list::{DrawCommand, DrawList};
use crate::glyphs;
use crate::vertex::Vertex;
use glam::{Affine2, Vec2};
use std::f32::consts::TAU;

/// Outline width in output pixels.
pub const STROKE_WIDTH: f32 = 2.0;

const DEFAULT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy)]
struct Pen {
    transform: Affine2,
    color: [f32; 4],
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            color: DEFAULT_COLOR,
        }
    }
}

/// Triangles in output pixel space, y down.
pub fn tessellate(list: &DrawList) -> Vec<Vertex> {
    let mut out = Vec::new();
    tessellate_into(list, &mut out);
    out
}

/// As [`tessellate`], reusing `out`.
pub fn tessellate_into(list: &DrawList, out: &mut Vec<Vertex>) {
    out.clear();
    let mut pen = Pen::default();
    let mut saved: Vec<Pen> = Vec::new();

    for command in list.commands() {
        match command {
            DrawCommand::Clear => out.clear(),
            DrawCommand::Save => saved.push(pen),
            DrawCommand::Restore => {
                if let Some(previous) = saved.pop() {
                    pen = previous;
                }
            }
            DrawCommand::Translate(offset) => {
                pen.transform = pen.transform * Affine2::from_translation(*offset);
            }
            DrawCommand::Rotate(radians) => {
                pen.transform = pen.transform * Affine2::from_angle(*radians);
            }
            DrawCommand::SetColor(color) => pen.color = color.to_linear_rgba(),
            DrawCommand::StrokeCircle { center, radius } => {
                ring(out, &pen, *center, *radius, STROKE_WIDTH);
            }
            DrawCommand::StrokeLine { from, to } => {
                line(out, &pen, *from, *to, STROKE_WIDTH);
            }
            DrawCommand::FillText { text, at, font_px } => {
                let width = glyphs::stroke_width(*font_px);
                for (from, to) in glyphs::text_strokes(text, *at, *font_px) {
                    line(out, &pen, from, to, width);
                }
            }
        }
    }
}

/// Map pixel-space vertices to clip space for a `viewport`-sized output.
pub fn to_clip_space(vertices: &mut [Vertex], viewport: Vec2) {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return;
    }
    for vertex in vertices {
        let [x, y] = vertex.position;
        vertex.position = [x / viewport.x * 2.0 - 1.0, 1.0 - y / viewport.y * 2.0];
    }
}

fn circle_segments(radius: f32) -> u32 {
    ((radius * 0.75) as u32).clamp(16, 128)
}

fn ring(out: &mut Vec<Vertex>, pen: &Pen, center: Vec2, radius: f32, width: f32) {
    let inner_radius = (radius - width / 2.0).max(0.0);
    let outer_radius = radius + width / 2.0;
    let segments = circle_segments(radius);

    let point = |r: f32, i: u32| {
        let theta = i as f32 / segments as f32 * TAU;
        pen.transform
            .transform_point2(center + Vec2::new(theta.cos(), theta.sin()) * r)
    };

    for i in 0..segments {
        let inner1 = point(inner_radius, i);
        let outer1 = point(outer_radius, i);
        let inner2 = point(inner_radius, i + 1);
        let outer2 = point(outer_radius, i + 1);

        push_triangle(out, pen.color, inner1, outer1, inner2);
        push_triangle(out, pen.color, inner2, outer1, outer2);
    }
}

fn line(out: &mut Vec<Vertex>, pen: &Pen, from: Vec2, to: Vec2, width: f32) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a = pen.transform.transform_point2(from + perp);
    let b = pen.transform.transform_point2(from - perp);
    let c = pen.transform.transform_point2(to + perp);
    let d = pen.transform.transform_point2(to - perp);

    push_triangle(out, pen.color, a, b, c);
    push_triangle(out, pen.color, c, b, d);
}

fn push_triangle(out: &mut Vec<Vertex>, color: [f32; 4], a: Vec2, b: Vec2, c: Vec2) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Hsl;
    use crate::painter::Painter;

    fn centroid(vertices: &[Vertex]) -> Vec2 {
        let sum = vertices
            .iter()
            .fold(Vec2::ZERO, |acc, v| acc + Vec2::from(v.position));
        sum / vertices.len() as f32
    }

    #[test]
    fn empty_list_draws_nothing() {
        assert!(tessellate(&DrawList::new()).is_empty());
    }

    #[test]
    fn circle_ring_hugs_radius() {
        let mut list = DrawList::new();
        list.translate(Vec2::new(72.0, 72.0));
        list.stroke_circle(Vec2::ZERO, 20.0);

        let vertices = tessellate(&list);
        assert_eq!(vertices.len(), 16 * 6);
        for v in &vertices {
            let r = (Vec2::from(v.position) - Vec2::new(72.0, 72.0)).length();
            assert!((19.0 - 1e-3..=21.0 + 1e-3).contains(&r), "r = {r}");
        }
        assert!((centroid(&vertices) - Vec2::new(72.0, 72.0)).length() < 0.5);
    }

    #[test]
    fn rotation_turns_up_into_right() {
        let mut list = DrawList::new();
        list.rotate(std::f32::consts::FRAC_PI_2);
        list.stroke_line(Vec2::new(0.0, -2.0), Vec2::new(0.0, -10.0));

        let vertices = tessellate(&list);
        assert_eq!(vertices.len(), 6);
        assert!((centroid(&vertices) - Vec2::new(6.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn restore_pops_transform_and_color() {
        let mut list = DrawList::new();
        list.set_color(Hsl::vivid(0.0));
        list.save();
        list.translate(Vec2::new(50.0, 0.0));
        list.set_color(Hsl::vivid(120.0));
        list.restore();
        list.stroke_line(Vec2::ZERO, Vec2::new(10.0, 0.0));

        let vertices = tessellate(&list);
        assert!((centroid(&vertices) - Vec2::new(5.0, 0.0)).length() < 1e-3);
        assert_eq!(vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn clear_discards_earlier_geometry() {
        let mut list = DrawList::new();
        list.stroke_line(Vec2::ZERO, Vec2::ONE);
        let mut out = Vec::new();
        tessellate_into(&list, &mut out);
        assert_eq!(out.len(), 6);

        list.clear();
        tessellate_into(&list, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn vertex_colors_are_linear() {
        let mut list = DrawList::new();
        list.set_color(Hsl::vivid(30.0));
        list.stroke_line(Vec2::ZERO, Vec2::new(4.0, 0.0));

        let vertices = tessellate(&list);
        let expected = Hsl::vivid(30.0).to_linear_rgba();
        assert!(vertices.iter().all(|v| v.color == expected));
        assert!((vertices[0].color[1] - 0.214_041).abs() < 1e-4);
    }

    #[test]
    fn digit_label_strokes() {
        let mut list = DrawList::new();
        list.fill_text("7", Vec2::ZERO, 16.0);
        assert_eq!(tessellate(&list).len(), 3 * 6);
    }

    #[test]
    fn degenerate_line_skipped() {
        let mut list = DrawList::new();
        list.stroke_line(Vec2::ONE, Vec2::ONE);
        assert!(tessellate(&list).is_empty());
    }

    #[test]
    fn clip_space_flips_y() {
        let mut vertices = vec![
            Vertex::new(0.0, 0.0, DEFAULT_COLOR),
            Vertex::new(720.0, 720.0, DEFAULT_COLOR),
            Vertex::new(72.0, 72.0, DEFAULT_COLOR),
        ];
        to_clip_space(&mut vertices, Vec2::splat(720.0));
        assert_eq!(vertices[0].position, [-1.0, 1.0]);
        assert_eq!(vertices[1].position, [1.0, -1.0]);
        assert!((vertices[2].position[0] + 0.8).abs() < 1e-6);
        assert!((vertices[2].position[1] - 0.8).abs() < 1e-6);
    }
}
