//! Window management

use winit::dpi::LogicalSize;
use winit::error::EventLoopError;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowAttributes};

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Dinnye".to_string(),
            width: 720,
            height: 720,
        }
    }
}

impl WindowConfig {
    /// Logical size as a float vector, for viewport maths.
    pub fn logical_size(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Window attributes for a fixed-size output surface.
pub fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(false)
}

pub fn create_event_loop() -> Result<EventLoop<()>, EventLoopError> {
    EventLoop::new()
}
