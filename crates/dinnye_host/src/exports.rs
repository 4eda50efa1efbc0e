//! Module exports, resolved once at load time
//!
//! Resolving up front turns a missing or mistyped export into a startup
//! failure instead of a mid-frame trap.

use crate::imports::HostState;
use dinnye_core::EngineError;
use wasmi::{AsContextMut, Func, Instance, Memory, Store, TypedFunc, WasmParams, WasmResults};

pub const INIT: &str = "init";
pub const STEP: &str = "simulate";
pub const ADD: &str = "addFruit";
pub const PREVIEW: &str = "previewFruit";
pub const COUNT: &str = "getNumFruits";
pub const EXTENT_X: &str = "getWorldSizeX";
pub const EXTENT_Y: &str = "getWorldSizeY";
pub const MEMORY: &str = "memory";

/// Address of the diagnostic radii table (global).
pub const RADII: &str = "radii";
pub const RADII_LEN: &str = "getNumRadii";

/// Words per record, as a function or a global.
pub const STRIDE_FN: &str = "getFloatsPerFruit";
pub const STRIDE_GLOBAL: &str = "floatsPerFruit";

/// `(x, y, sizeClass, seed)`
pub type PlaceParams = (f32, f32, i32, i32);

/// Zero-argument export returning a number, either as `i32` or `f32`.
pub enum Scalar {
    Int(TypedFunc<(), i32>),
    Float(TypedFunc<(), f32>),
}

impl Scalar {
    fn resolve(
        instance: &Instance,
        store: &Store<HostState>,
        name: &'static str,
    ) -> Result<Self, EngineError> {
        let func = func(instance, store, name)?;
        if let Ok(int) = func.typed::<(), i32>(store) {
            return Ok(Scalar::Int(int));
        }
        typed::<(), f32>(&func, store, name).map(Scalar::Float)
    }

    pub fn call(&self, store: impl AsContextMut) -> Result<f64, wasmi::Error> {
        match self {
            Scalar::Int(f) => f.call(store, ()).map(f64::from),
            Scalar::Float(f) => f.call(store, ()).map(f64::from),
        }
    }
}

/// `addFruit`, with or without a success flag.
pub enum AddFn {
    Flag(TypedFunc<PlaceParams, i32>),
    Void(TypedFunc<PlaceParams, ()>),
}

impl AddFn {
    pub fn call(
        &self,
        store: impl AsContextMut,
        params: PlaceParams,
    ) -> Result<bool, wasmi::Error> {
        match self {
            AddFn::Flag(f) => f.call(store, params).map(|added| added != 0),
            AddFn::Void(f) => f.call(store, params).map(|()| true),
        }
    }
}

pub struct Exports {
    pub init: TypedFunc<i32, i32>,
    pub step: TypedFunc<i32, i32>,
    pub add: AddFn,
    pub preview: TypedFunc<PlaceParams, i32>,
    pub count: Scalar,
    pub extent_x: Scalar,
    pub extent_y: Scalar,
    pub memory: Memory,
}

impl Exports {
    pub fn resolve(instance: &Instance, store: &Store<HostState>) -> Result<Self, EngineError> {
        let add_func = func(instance, store, ADD)?;
        let add = match add_func.typed::<PlaceParams, i32>(store) {
            Ok(flag) => AddFn::Flag(flag),
            Err(_) => AddFn::Void(typed(&add_func, store, ADD)?),
        };

        Ok(Self {
            init: typed(&func(instance, store, INIT)?, store, INIT)?,
            step: typed(&func(instance, store, STEP)?, store, STEP)?,
            add,
            preview: typed(&func(instance, store, PREVIEW)?, store, PREVIEW)?,
            count: Scalar::resolve(instance, store, COUNT)?,
            extent_x: Scalar::resolve(instance, store, EXTENT_X)?,
            extent_y: Scalar::resolve(instance, store, EXTENT_Y)?,
            memory: instance
                .get_memory(store, MEMORY)
                .ok_or(EngineError::MissingExport { name: MEMORY })?,
        })
    }
}

pub(crate) fn func(
    instance: &Instance,
    store: &Store<HostState>,
    name: &'static str,
) -> Result<Func, EngineError> {
    instance
        .get_func(store, name)
        .ok_or(EngineError::MissingExport { name })
}

pub(crate) fn typed<P, R>(
    func: &Func,
    store: &Store<HostState>,
    name: &'static str,
) -> Result<TypedFunc<P, R>, EngineError>
where
    P: WasmParams,
    R: WasmResults,
{
    func.typed::<P, R>(store)
        .map_err(|err| EngineError::SignatureMismatch {
            name,
            detail: err.to_string(),
        })
}
