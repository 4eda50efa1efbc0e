//! `wasmi`-backed simulation engine

use crate::exports::{self, Exports, PlaceParams};
use crate::imports::{self, HostState};
use dinnye_core::layout::WORD_BYTES;
use dinnye_core::{Address, EngineError, RecordLayout, SimulationEngine, WorldExtent};
use std::path::Path;
use wasmi::{Engine, Instance, Linker, Module, Store, Val};

/// Radii table length when the module does not export `getNumRadii`.
pub const DEFAULT_RADII_LEN: usize = 11;

/// Host-side knobs for loading a module.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Record stride to assume when the module does not declare one.
    pub stride_words: Option<usize>,
}

pub struct WasmEngine {
    store: Store<HostState>,
    instance: Instance,
    exports: Exports,
    layout: RecordLayout,
}

impl WasmEngine {
    pub fn from_file(path: &Path, options: LoadOptions) -> Result<Self, EngineError> {
        let wasm = std::fs::read(path).map_err(|err| EngineError::Load {
            reason: format!("{}: {err}", path.display()),
        })?;
        Self::load(&wasm, options)
    }

    /// Instantiate a module from binary or text format.
    pub fn load(wasm: &[u8], options: LoadOptions) -> Result<Self, EngineError> {
        let engine = Engine::default();
        let module = Module::new(&engine, wasm).map_err(|err| EngineError::Load {
            reason: err.to_string(),
        })?;

        let mut store = Store::new(&engine, HostState::default());
        let mut linker = <Linker<HostState>>::new(&engine);
        imports::link(&mut linker)?;

        let instance = linker
            .instantiate(&mut store, &module)
            .map_err(instantiate_error)?
            .ensure_no_start(&mut store)
            .map_err(instantiate_error)?;

        let exports = Exports::resolve(&instance, &store)?;
        let declared = declared_stride(&instance, &mut store)?;
        let layout = resolve_layout(declared, options.stride_words)?;

        tracing::info!(
            stride_words = layout.stride_words(),
            arena_kib = exports.memory.data_size(&store) >> 10,
            "simulation module loaded"
        );

        Ok(Self {
            store,
            instance,
            exports,
            layout,
        })
    }

    /// Growth statistics gathered by the host hooks.
    pub fn host_state(&self) -> &HostState {
        self.store.data()
    }

    fn place_params(x: f32, y: f32, size_class: u32, seed: i32) -> PlaceParams {
        (x, y, size_class as i32, seed)
    }
}

fn instantiate_error(err: impl std::fmt::Display) -> EngineError {
    EngineError::Instantiate {
        reason: err.to_string(),
    }
}

fn trap(call: &'static str) -> impl FnOnce(wasmi::Error) -> EngineError {
    move |err| EngineError::Trap {
        call,
        reason: err.to_string(),
    }
}

/// Words per record as declared by the module, if it declares it.
fn declared_stride(
    instance: &Instance,
    store: &mut Store<HostState>,
) -> Result<Option<usize>, EngineError> {
    if let Some(func) = instance.get_func(&*store, exports::STRIDE_FN) {
        let typed = exports::typed::<(), i32>(&func, store, exports::STRIDE_FN)?;
        let words = typed
            .call(&mut *store, ())
            .map_err(trap(exports::STRIDE_FN))?;
        return Ok(Some(words.max(0) as usize));
    }

    match instance
        .get_global(&*store, exports::STRIDE_GLOBAL)
        .map(|global| global.get(&*store))
    {
        Some(Val::I32(words)) => Ok(Some(words.max(0) as usize)),
        Some(other) => Err(EngineError::SignatureMismatch {
            name: exports::STRIDE_GLOBAL,
            detail: format!("expected i32 global, found {other:?}"),
        }),
        None => Ok(None),
    }
}

/// Pick the record layout: module declaration, then settings, then canonical.
pub fn resolve_layout(
    declared: Option<usize>,
    configured: Option<usize>,
) -> Result<RecordLayout, EngineError> {
    let words = match (declared, configured) {
        (Some(declared), Some(configured)) if declared != configured => {
            tracing::warn!(
                declared,
                configured,
                "module-declared record stride overrides configured stride"
            );
            declared
        }
        (Some(words), _) | (None, Some(words)) => words,
        (None, None) => {
            tracing::warn!(
                stride_words = RecordLayout::CANONICAL.stride_words(),
                "module does not declare a record stride, assuming canonical layout"
            );
            return Ok(RecordLayout::CANONICAL);
        }
    };

    RecordLayout::for_stride(words).ok_or(EngineError::SignatureMismatch {
        name: exports::STRIDE_FN,
        detail: format!("record stride of {words} words is too small"),
    })
}

impl SimulationEngine for WasmEngine {
    fn init(&mut self, seed: i32) -> Result<Address, EngineError> {
        let raw = self
            .exports
            .init
            .call(&mut self.store, seed)
            .map_err(trap(exports::INIT))?;
        Ok(Address::new(raw as u32))
    }

    fn step(&mut self, seed: i32) -> Result<Address, EngineError> {
        let raw = self
            .exports
            .step
            .call(&mut self.store, seed)
            .map_err(trap(exports::STEP))?;
        Ok(Address::new(raw as u32))
    }

    fn add_object(
        &mut self,
        x: f32,
        y: f32,
        size_class: u32,
        seed: i32,
    ) -> Result<bool, EngineError> {
        self.exports
            .add
            .call(&mut self.store, Self::place_params(x, y, size_class, seed))
            .map_err(trap(exports::ADD))
    }

    fn preview_object(
        &mut self,
        x: f32,
        y: f32,
        size_class: u32,
        seed: i32,
    ) -> Result<Option<Address>, EngineError> {
        let raw = self
            .exports
            .preview
            .call(&mut self.store, Self::place_params(x, y, size_class, seed))
            .map_err(trap(exports::PREVIEW))?;
        Ok(Address::from_raw(raw))
    }

    fn object_count(&mut self) -> Result<usize, EngineError> {
        let count = self
            .exports
            .count
            .call(&mut self.store)
            .map_err(trap(exports::COUNT))?;
        if !(count.is_finite() && count >= 0.0) {
            return Err(EngineError::SignatureMismatch {
                name: exports::COUNT,
                detail: format!("object count {count} is not a non-negative number"),
            });
        }
        Ok(count as usize)
    }

    fn world_extent(&mut self) -> Result<WorldExtent, EngineError> {
        let x = self
            .exports
            .extent_x
            .call(&mut self.store)
            .map_err(trap(exports::EXTENT_X))?;
        let y = self
            .exports
            .extent_y
            .call(&mut self.store)
            .map_err(trap(exports::EXTENT_Y))?;
        Ok(WorldExtent::new(x as f32, y as f32))
    }

    fn layout(&self) -> RecordLayout {
        self.layout
    }

    fn arena(&self) -> &[u8] {
        self.exports.memory.data(&self.store)
    }

    fn radii(&mut self) -> Result<Vec<f32>, EngineError> {
        let Some(global) = self.instance.get_global(&self.store, exports::RADII) else {
            return Ok(Vec::new());
        };
        let address = match global.get(&self.store) {
            Val::I32(address) => address as u32 as usize,
            other => {
                return Err(EngineError::SignatureMismatch {
                    name: exports::RADII,
                    detail: format!("expected i32 address global, found {other:?}"),
                })
            }
        };

        let len = match self.instance.get_func(&self.store, exports::RADII_LEN) {
            Some(func) => {
                let typed = exports::typed::<(), i32>(&func, &self.store, exports::RADII_LEN)?;
                let len = typed
                    .call(&mut self.store, ())
                    .map_err(trap(exports::RADII_LEN))?;
                len.max(0) as usize
            }
            None => DEFAULT_RADII_LEN,
        };

        let arena = self.arena();
        let bytes = address
            .checked_add(len * WORD_BYTES)
            .and_then(|end| arena.get(address..end))
            .ok_or(EngineError::InvalidAddress {
                call: exports::RADII,
                address: address as i64,
            })?;

        Ok(bytes
            .chunks_exact(WORD_BYTES)
            .map(|w| f32::from_le_bytes([w[0], w[1], w[2], w[3]]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_stride_wins() {
        let layout = resolve_layout(Some(8), Some(11)).unwrap();
        assert_eq!(layout.stride_words(), 8);
    }

    #[test]
    fn configured_stride_used_when_undeclared() {
        let layout = resolve_layout(None, Some(6)).unwrap();
        assert_eq!(layout.stride_words(), 6);
        assert_eq!(layout.size_index, None);
    }

    #[test]
    fn falls_back_to_canonical() {
        assert_eq!(resolve_layout(None, None).unwrap(), RecordLayout::CANONICAL);
    }

    #[test]
    fn rejects_tiny_stride() {
        let err = resolve_layout(Some(3), None).unwrap_err();
        assert!(matches!(err, EngineError::SignatureMismatch { .. }));
    }
}
