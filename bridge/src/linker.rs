//! Host function registration via the wasmtime linker.
//!
//! Registers the `env` import surface. Each function:
//! 1. Re-derives the guest memory from the `Caller` (views are never cached
//!    across calls — the buffer may move on growth)
//! 2. Splits the store into the data slice and `BridgeState`
//! 3. Delegates to the marshalling layer
//! 4. Propagates any `HostError` as a trap, aborting the guest→host call
//!
//! All scalar arguments are `u32` handles, pointers, and element counts,
//! plus `i32`/`f32`/`f64` for the numeric box imports.

use anyhow::anyhow;
use wasmtime::{Caller, Linker, Memory};

use crate::error::BridgeError;
use crate::marshal;
use crate::state::BridgeState;

/// Get the guest's exported memory from a `Caller`.
fn guest_memory(caller: &mut Caller<'_, BridgeState>) -> wasmtime::Result<Memory> {
    caller
        .get_export("memory")
        .and_then(|e| e.into_memory())
        .ok_or_else(|| anyhow!("guest does not export linear memory"))
}

/// Register all `env` host functions with the linker.
pub fn register_host_functions(linker: &mut Linker<BridgeState>) -> Result<(), BridgeError> {
    register_text(linker)?;
    register_bytes(linker)?;
    register_words(linker)?;
    register_functions(linker)?;
    register_numerics(linker)?;
    register_free(linker)?;
    register_say(linker)?;
    Ok(())
}

// ── Text marshalling ──

fn register_text(linker: &mut Linker<BridgeState>) -> Result<(), BridgeError> {
    linker.func_wrap(
        "env",
        "text_new",
        |mut caller: Caller<'_, BridgeState>, ptr: u32, len: u32| -> wasmtime::Result<u32> {
            let mem = guest_memory(&mut caller)?;
            let (data, state) = mem.data_and_store_mut(&mut caller);
            Ok(marshal::decode_text(state, data, ptr, len)?)
        },
    )?;
    linker.func_wrap(
        "env",
        "text_read",
        |mut caller: Caller<'_, BridgeState>,
         handle: u32,
         ptr: u32,
         len: u32|
         -> wasmtime::Result<u32> {
            let mem = guest_memory(&mut caller)?;
            let (data, state) = mem.data_and_store_mut(&mut caller);
            Ok(marshal::encode_text(state, data, handle, ptr, len)?)
        },
    )?;
    Ok(())
}

// ── Byte and word buffers ──

fn register_bytes(linker: &mut Linker<BridgeState>) -> Result<(), BridgeError> {
    linker.func_wrap(
        "env",
        "bytes_new",
        |mut caller: Caller<'_, BridgeState>, ptr: u32, len: u32| -> wasmtime::Result<u32> {
            let mem = guest_memory(&mut caller)?;
            let (data, state) = mem.data_and_store_mut(&mut caller);
            Ok(marshal::decode_bytes(state, data, ptr, len)?)
        },
    )?;
    linker.func_wrap(
        "env",
        "bytes_read",
        |mut caller: Caller<'_, BridgeState>,
         handle: u32,
         ptr: u32,
         len: u32|
         -> wasmtime::Result<u32> {
            let mem = guest_memory(&mut caller)?;
            let (data, state) = mem.data_and_store_mut(&mut caller);
            Ok(marshal::encode_bytes(state, data, handle, ptr, len)?)
        },
    )?;
    Ok(())
}

fn register_words(linker: &mut Linker<BridgeState>) -> Result<(), BridgeError> {
    linker.func_wrap(
        "env",
        "words_new",
        |mut caller: Caller<'_, BridgeState>, ptr: u32, len: u32| -> wasmtime::Result<u32> {
            let mem = guest_memory(&mut caller)?;
            let (data, state) = mem.data_and_store_mut(&mut caller);
            Ok(marshal::decode_words(state, data, ptr, len)?)
        },
    )?;
    linker.func_wrap(
        "env",
        "words_read",
        |mut caller: Caller<'_, BridgeState>,
         handle: u32,
         ptr: u32,
         len: u32|
         -> wasmtime::Result<u32> {
            let mem = guest_memory(&mut caller)?;
            let (data, state) = mem.data_and_store_mut(&mut caller);
            Ok(marshal::encode_words(state, data, handle, ptr, len)?)
        },
    )?;
    Ok(())
}

// ── Callable construction and invocation ──

fn register_functions(linker: &mut Linker<BridgeState>) -> Result<(), BridgeError> {
    linker.func_wrap(
        "env",
        "func_new",
        |mut caller: Caller<'_, BridgeState>, source: u32| -> wasmtime::Result<u32> {
            Ok(marshal::construct_function(caller.data_mut(), source)?)
        },
    )?;
    linker.func_wrap(
        "env",
        "func_call",
        |mut caller: Caller<'_, BridgeState>,
         func: u32,
         a: u32,
         b: u32|
         -> wasmtime::Result<u32> {
            Ok(marshal::invoke(caller.data_mut(), func, a, b)?)
        },
    )?;
    Ok(())
}

// ── Numeric boxes ──

fn register_numerics(linker: &mut Linker<BridgeState>) -> Result<(), BridgeError> {
    linker.func_wrap(
        "env",
        "int_new",
        |mut caller: Caller<'_, BridgeState>, value: i32| -> wasmtime::Result<u32> {
            Ok(marshal::store_int(caller.data_mut(), value)?)
        },
    )?;
    linker.func_wrap(
        "env",
        "int_get",
        |caller: Caller<'_, BridgeState>, handle: u32| -> wasmtime::Result<i32> {
            Ok(marshal::load_int(caller.data(), handle)?)
        },
    )?;
    linker.func_wrap(
        "env",
        "float_new",
        |mut caller: Caller<'_, BridgeState>, value: f32| -> wasmtime::Result<u32> {
            Ok(marshal::store_float(caller.data_mut(), value)?)
        },
    )?;
    linker.func_wrap(
        "env",
        "float_get",
        |caller: Caller<'_, BridgeState>, handle: u32| -> wasmtime::Result<f32> {
            Ok(marshal::load_float(caller.data(), handle)?)
        },
    )?;
    linker.func_wrap(
        "env",
        "double_new",
        |mut caller: Caller<'_, BridgeState>, value: f64| -> wasmtime::Result<u32> {
            Ok(marshal::store_double(caller.data_mut(), value)?)
        },
    )?;
    linker.func_wrap(
        "env",
        "double_get",
        |caller: Caller<'_, BridgeState>, handle: u32| -> wasmtime::Result<f64> {
            Ok(marshal::load_double(caller.data(), handle)?)
        },
    )?;
    Ok(())
}

// ── Reclamation ──

fn register_free(linker: &mut Linker<BridgeState>) -> Result<(), BridgeError> {
    linker.func_wrap(
        "env",
        "object_free",
        |mut caller: Caller<'_, BridgeState>, handle: u32| -> wasmtime::Result<()> {
            Ok(marshal::free(caller.data_mut(), handle)?)
        },
    )?;
    Ok(())
}

// ── Guest logging ──

fn register_say(linker: &mut Linker<BridgeState>) -> Result<(), BridgeError> {
    linker.func_wrap(
        "env",
        "say",
        |mut caller: Caller<'_, BridgeState>, ptr: u32, len: u32| -> wasmtime::Result<()> {
            let mem = guest_memory(&mut caller)?;
            let (data, state) = mem.data_and_store_mut(&mut caller);
            Ok(marshal::guest_say(state, data, ptr, len)?)
        },
    )?;
    Ok(())
}
