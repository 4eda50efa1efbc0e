//! Dinnye Render System
//!
//! Turns decoded records into drawing commands and presents them.
//!
//! - [`fruit::FruitRenderer`] maps each record to an oriented, colour-coded,
//!   optionally labeled disc through the canvas-like [`painter::Painter`] sink
//! - [`draw_list::DrawList`] records those commands for one frame
//! - [`shapes`] tessellates a draw list into triangles
//! - [`gpu::GpuCanvas`] uploads and presents them with wgpu

pub mod color;
pub mod draw_list;
pub mod fruit;
pub mod glyphs;
pub mod gpu;
pub mod painter;
pub mod shapes;
pub mod vertex;
pub mod window;

pub use color::Hsl;
pub use draw_list::{DrawCommand, DrawList};
pub use fruit::FruitRenderer;
pub use gpu::{GpuCanvas, RenderError};
pub use painter::Painter;
pub use vertex::Vertex;
pub use window::WindowConfig;

pub use wgpu;
pub use winit;
