//! Dinnye Core
//!
//! Host-side contract with the simulation module:
//! - Arena growth negotiation (page rounding, size queries)
//! - Engine boundary trait and addresses into the shared arena
//! - Record layout and per-frame decoding
//! - Seed generation for init/step calls

pub mod arena;
pub mod decode;
pub mod engine;
pub mod error;
pub mod layout;
pub mod record;
pub mod seed;

#[cfg(any(test, feature = "test-utils"))]
pub mod fake;

pub use glam;

pub use arena::{negotiate_growth, GrowthDecision, PAGE_SIZE};
pub use decode::{DecodedFrame, FrameDecoder};
pub use engine::{Address, SimulationEngine, WorldExtent};
pub use error::{DecodeError, EngineError};
pub use layout::RecordLayout;
pub use record::FruitRecord;
pub use seed::SeedSource;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
