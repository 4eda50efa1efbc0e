//! Boundary with the opaque simulation module
//!
//! The physics lives in an externally supplied module. The host only sees a
//! narrow set of calls, each returning an address into the module's arena.
//! Nothing about the module's internal state is assumed beyond these values.

use crate::error::EngineError;
use crate::layout::RecordLayout;
use std::fmt;

/// Byte address inside the simulation arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u32);

impl Address {
    #[inline]
    pub const fn new(bytes: u32) -> Self {
        Self(bytes)
    }

    /// Interpret a raw 32-bit wasm pointer. Zero means "no record".
    #[inline]
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw as u32 {
            0 => None,
            bytes => Some(Self(bytes)),
        }
    }

    /// Byte offset from the start of the arena.
    #[inline]
    pub fn offset(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Size of the simulated world in world units.
///
/// Constant for the lifetime of a loaded module.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldExtent {
    pub x: f32,
    pub y: f32,
}

impl WorldExtent {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Pixels per world unit when the larger extent spans `output_size` pixels.
    pub fn scale_for(&self, output_size: f32) -> f32 {
        output_size / self.x.max(self.y)
    }
}

/// Calls the host makes into the simulation module.
///
/// Every call may synchronously re-enter the host to grow the arena, which
/// replaces its storage. [`arena`](Self::arena) borrows the current storage,
/// so the borrow checker rules out holding a view across any of the `&mut`
/// calls below.
pub trait SimulationEngine {
    /// Reset the simulation from `seed`; returns the base of the record array.
    fn init(&mut self, seed: i32) -> Result<Address, EngineError>;

    /// Advance one frame; returns the base of the record array.
    fn step(&mut self, seed: i32) -> Result<Address, EngineError>;

    /// Introduce an object. `false` when the module refused it (e.g. full).
    fn add_object(
        &mut self,
        x: f32,
        y: f32,
        size_class: u32,
        seed: i32,
    ) -> Result<bool, EngineError>;

    /// Speculative placement that leaves simulation state untouched.
    ///
    /// `None` means there is no valid preview this frame.
    fn preview_object(
        &mut self,
        x: f32,
        y: f32,
        size_class: u32,
        seed: i32,
    ) -> Result<Option<Address>, EngineError>;

    /// Number of live records at the base address.
    fn object_count(&mut self) -> Result<usize, EngineError>;

    fn world_extent(&mut self) -> Result<WorldExtent, EngineError>;

    /// Record layout declared by (or resolved for) this module build.
    fn layout(&self) -> RecordLayout;

    /// Current arena bytes. Re-borrow after every engine call.
    fn arena(&self) -> &[u8];

    /// Diagnostic radii table, when the module exposes one.
    fn radii(&mut self) -> Result<Vec<f32>, EngineError> {
        Ok(Vec::new())
    }
}
