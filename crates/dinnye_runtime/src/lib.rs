//! Dinnye Runtime
//!
//! The frame loop and its winit shell.

pub mod app;
pub mod scheduler;

pub use app::App;
pub use scheduler::{FrameError, FrameReport, FrameScheduler, SchedulerState};
