//! Host functions linked into the module's `env` namespace

use dinnye_core::arena::{kib, negotiate_growth};
use dinnye_core::EngineError;
use wasmi::{Caller, Extern, Linker};

pub const ENV: &str = "env";
pub const GROWTH_HOOK: &str = "setMemorySize";
pub const LOG_VALUE: &str = "dumpInt";
pub const LOG_QUAD: &str = "dumpQuadInt";

/// Store data visible to host functions.
///
/// Holds no scheduling state: the growth hook runs re-entrantly
/// inside an engine call and may only touch the arena.
#[derive(Debug, Default)]
pub struct HostState {
    /// Times the arena was actually grown.
    pub growths: usize,
    /// Largest size the module has asked for.
    pub peak_request: usize,
}

/// Link the growth hook and diagnostic hooks.
pub fn link(linker: &mut Linker<HostState>) -> Result<(), EngineError> {
    linker
        .func_wrap(ENV, GROWTH_HOOK, growth_hook)
        .map_err(link_error)?;
    linker
        .func_wrap(ENV, LOG_VALUE, |value: i32| {
            tracing::debug!(target: "dinnye::module", value);
        })
        .map_err(link_error)?;
    linker
        .func_wrap(ENV, LOG_QUAD, |a: i64, b: i64, c: i64, d: i64| {
            tracing::debug!(target: "dinnye::module", a, b, c, d);
        })
        .map_err(link_error)?;
    Ok(())
}

fn link_error(err: impl std::fmt::Display) -> EngineError {
    EngineError::Instantiate {
        reason: err.to_string(),
    }
}

/// `setMemorySize(bytes) -> usableBytes`
///
/// Zero is a pure size query. Otherwise grow by whole pages until the arena
/// holds `bytes`; smaller requests are no-ops.
fn growth_hook(mut caller: Caller<'_, HostState>, bytes: i32) -> i32 {
    let Some(memory) = caller.get_export("memory").and_then(Extern::into_memory) else {
        tracing::warn!("growth hook called but module exports no memory");
        return 0;
    };

    let requested = bytes as u32 as usize;
    let decision = negotiate_growth(memory.data_size(&caller), requested);

    if decision.grows() {
        tracing::debug!(pages = decision.pages, "growing arena by {} KiB", decision.pages * 64);
        match memory.grow(&mut caller, decision.pages as u64) {
            Ok(_) => caller.data_mut().growths += 1,
            Err(err) => tracing::warn!(%err, requested, "arena growth refused"),
        }
    }

    let available = memory.data_size(&caller);
    if !decision.is_query() {
        let state = caller.data_mut();
        state.peak_request = state.peak_request.max(requested);
        tracing::debug!(
            "kbytes required: {}, overall available: {}",
            kib(requested),
            kib(available)
        );
    }
    wire_length(available)
}

/// Byte length as the module's unsigned 32-bit return value. A full 4 GiB
/// memory saturates at `u32::MAX`.
fn wire_length(bytes: usize) -> i32 {
    u32::try_from(bytes).unwrap_or(u32::MAX) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_keep_their_unsigned_bits() {
        assert_eq!(wire_length(131_072), 131_072);
        assert_eq!(wire_length(3 << 30) as u32, 3 << 30);
        assert_eq!(wire_length(1 << 32) as u32, u32::MAX);
    }
}
