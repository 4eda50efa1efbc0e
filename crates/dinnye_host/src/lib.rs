//! Dinnye Module Host
//!
//! Runs the simulation module under `wasmi` and exposes it as a
//! [`dinnye_core::SimulationEngine`].
//!
//! ## Wire contract
//!
//! - **Imports (`env`):** `setMemorySize` (growth hook), `dumpInt`,
//!   `dumpQuadInt` (diagnostic logging)
//! - **Exports:** `init`, `simulate`, `addFruit`, `previewFruit`,
//!   `getNumFruits`, `getWorldSizeX`, `getWorldSizeY`, `memory`, and the
//!   optional `radii`, `getNumRadii`, `getFloatsPerFruit`/`floatsPerFruit`
//!
//! The module's memory is the arena; the host never allocates it, only grows
//! it when the module asks.

pub mod exports;
pub mod imports;
pub mod wasm;

pub use wasm::{LoadOptions, WasmEngine};

pub use wasmi;
