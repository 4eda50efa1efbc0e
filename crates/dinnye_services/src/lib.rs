//! Dinnye Services
//!
//! Host-side collaborators of the frame loop: user input and settings.

pub mod input;
pub mod settings;

pub use input::{InputController, PendingObject};
pub use settings::{Settings, SettingsError};
