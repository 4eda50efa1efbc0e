//! winit application shell
//!
//! Owns the window and GPU canvas, forwards pointer input to the scheduler,
//! and runs one frame per redraw.

use crate::scheduler::FrameScheduler;
use dinnye_core::SimulationEngine;
use dinnye_render::window::{window_attributes, WindowConfig};
use dinnye_render::wgpu::SurfaceError;
use dinnye_render::{DrawList, GpuCanvas};
use glam::Vec2;
use rand::Rng;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

pub struct App<E, R> {
    config: WindowConfig,
    scheduler: FrameScheduler<E, R>,
    window: Option<Arc<Window>>,
    canvas: Option<GpuCanvas>,
    list: DrawList,
    cursor: Vec2,
    /// Touch id standing in for the primary pointer.
    primary_touch: Option<u64>,
    fatal: Option<anyhow::Error>,
}

impl<E: SimulationEngine, R: Rng> App<E, R> {
    pub fn new(config: WindowConfig, scheduler: FrameScheduler<E, R>) -> Self {
        Self {
            config,
            scheduler,
            window: None,
            canvas: None,
            list: DrawList::new(),
            cursor: Vec2::ZERO,
            primary_touch: None,
            fatal: None,
        }
    }

    pub fn scheduler(&self) -> &FrameScheduler<E, R> {
        &self.scheduler
    }

    /// Error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.fatal.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    /// Window pixels to output pixels.
    fn to_screen(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
        let logical = position.to_logical::<f32>(scale_factor);
        Vec2::new(logical.x, logical.y)
    }

    fn commit(&mut self, event_loop: &ActiveEventLoop, screen: Vec2) {
        if let Err(err) = self.scheduler.commit(screen) {
            self.fail(event_loop, err.into());
        }
    }

    fn touch(&mut self, event_loop: &ActiveEventLoop, touch: Touch) {
        let screen = self.to_screen(touch.location);
        let primary = match (touch.phase, self.primary_touch) {
            (TouchPhase::Started, None) => {
                self.primary_touch = Some(touch.id);
                true
            }
            (_, Some(id)) => id == touch.id,
            _ => false,
        };

        match touch.phase {
            TouchPhase::Started | TouchPhase::Moved => {
                self.scheduler.pointer_moved(screen, primary);
            }
            TouchPhase::Ended if primary => {
                self.primary_touch = None;
                self.scheduler.pointer_moved(screen, true);
                self.commit(event_loop, screen);
            }
            TouchPhase::Cancelled if primary => self.primary_touch = None,
            TouchPhase::Ended | TouchPhase::Cancelled => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.scheduler.tick(&mut self.list) {
            self.fail(event_loop, err.into());
            return;
        }

        let Some(canvas) = &mut self.canvas else {
            return;
        };
        match canvas.present(&self.list) {
            Ok(()) => {}
            Err(SurfaceError::Lost | SurfaceError::Outdated) => canvas.reconfigure(),
            Err(SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow::anyhow!("graphics device out of memory"));
            }
            Err(err) => tracing::warn!(%err, "frame dropped"),
        }
    }
}

impl<E: SimulationEngine, R: Rng> ApplicationHandler for App<E, R> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };
        match pollster::block_on(GpuCanvas::new(window.clone(), self.config.logical_size())) {
            Ok(canvas) => self.canvas = Some(canvas),
            Err(err) => return self.fail(event_loop, err.into()),
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(canvas) = &mut self.canvas {
                    canvas.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = self.to_screen(position);
                self.scheduler.pointer_moved(self.cursor, true);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.commit(event_loop, self.cursor);
            }
            WindowEvent::Touch(touch) => {
                self.touch(event_loop, touch);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
