use thiserror::Error;

/// Errors raised at the boundary with the simulation module.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to load simulation module: {reason}")]
    Load { reason: String },

    #[error("failed to instantiate simulation module: {reason}")]
    Instantiate { reason: String },

    #[error("simulation module is missing required export '{name}'")]
    MissingExport { name: &'static str },

    #[error("export '{name}' has an unsupported signature or value: {detail}")]
    SignatureMismatch { name: &'static str, detail: String },

    #[error("simulation module trapped in '{call}': {reason}")]
    Trap { call: &'static str, reason: String },

    #[error("simulation module returned invalid address {address:#x} from '{call}'")]
    InvalidAddress { call: &'static str, address: i64 },
}

/// Errors raised while reading records out of the arena.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("record at byte {offset} ({len} bytes) lies outside the {arena_len}-byte arena")]
    OutOfBounds {
        offset: usize,
        len: usize,
        arena_len: usize,
    },
}
