//! The marshalling layer — conversions between guest linear memory ranges
//! and host handles, and callable construction/invocation on behalf of the
//! guest.
//!
//! Decode operations (`*_new`) read a `(pointer, element-count)` range out
//! of guest memory into a fresh host value and return its handle. Encode
//! operations (`*_read`) copy a host value back into guest memory and return
//! the value's **actual** element count, so a caller comparing it to the
//! requested count can detect truncation. Passing count 0 is the probe call
//! of the measure-then-copy protocol: nothing is written and the caller
//! learns the size needed for the second call.
//!
//! Every function takes the memory slice by argument; callers derive it from
//! the `Caller` per invocation and never hold it across calls.

use gangway_hostapi::{Handle, HandleTable, HostError, HostValue, NO_VALUE};

use crate::config::FunctionPlacement;
use crate::memory;
use crate::state::BridgeState;

/// Decode `len` UTF-16 code units at `ptr` into a host string handle.
pub fn decode_text(
    state: &mut BridgeState,
    mem: &[u8],
    ptr: u32,
    len: u32,
) -> Result<Handle, HostError> {
    let units = memory::read_u16s(mem, ptr, len)?;
    let text = String::from_utf16(&units).map_err(|_| HostError::InvalidEncoding)?;
    state.table.allocate(HostValue::Text(text))
}

/// Copy up to `len` UTF-16 code units of the string at `handle` into guest
/// memory at `ptr`. Returns the string's total code-unit count.
pub fn encode_text(
    state: &BridgeState,
    mem: &mut [u8],
    handle: Handle,
    ptr: u32,
    len: u32,
) -> Result<u32, HostError> {
    let text = state.table.resolve_text(handle)?;
    memory::validate_range(mem.len(), ptr, len as u64 * 2)?;
    let units: Vec<u16> = text.encode_utf16().collect();
    let copied = units.len().min(len as usize);
    memory::write_u16s(mem, ptr, &units[..copied])?;
    Ok(units.len() as u32)
}

/// Decode `len` raw bytes at `ptr` into a host buffer handle.
pub fn decode_bytes(
    state: &mut BridgeState,
    mem: &[u8],
    ptr: u32,
    len: u32,
) -> Result<Handle, HostError> {
    let bytes = memory::read_bytes(mem, ptr, len)?;
    state.table.allocate(HostValue::Bytes(bytes))
}

/// Copy up to `len` bytes of the buffer at `handle` into guest memory at
/// `ptr`. Returns the buffer's total byte count.
pub fn encode_bytes(
    state: &BridgeState,
    mem: &mut [u8],
    handle: Handle,
    ptr: u32,
    len: u32,
) -> Result<u32, HostError> {
    let bytes = state.table.resolve(handle)?.expect_bytes(handle)?;
    memory::validate_range(mem.len(), ptr, len as u64)?;
    let copied = bytes.len().min(len as usize);
    memory::write_bytes(mem, ptr, &bytes[..copied])?;
    Ok(bytes.len() as u32)
}

/// Decode `len` 32-bit words at `ptr` into a host word-buffer handle.
pub fn decode_words(
    state: &mut BridgeState,
    mem: &[u8],
    ptr: u32,
    len: u32,
) -> Result<Handle, HostError> {
    let words = memory::read_u32s(mem, ptr, len)?;
    state.table.allocate(HostValue::Words(words))
}

/// Copy up to `len` words of the buffer at `handle` into guest memory at
/// `ptr`. Returns the buffer's total word count.
pub fn encode_words(
    state: &BridgeState,
    mem: &mut [u8],
    handle: Handle,
    ptr: u32,
    len: u32,
) -> Result<u32, HostError> {
    let words = state.table.resolve(handle)?.expect_words(handle)?;
    memory::validate_range(mem.len(), ptr, len as u64 * 4)?;
    let copied = words.len().min(len as usize);
    memory::write_u32s(mem, ptr, &words[..copied])?;
    Ok(words.len() as u32)
}

/// Build a callable from the source text at `source` and place it per the
/// session's placement policy. No handle is allocated when construction
/// fails.
pub fn construct_function(state: &mut BridgeState, source: Handle) -> Result<Handle, HostError> {
    let text = state.table.resolve_text(source)?;
    let callable = state.factory.construct(text)?;
    match state.placement {
        FunctionPlacement::ObjectTable => state.table.allocate(HostValue::Callable(callable)),
        FunctionPlacement::CallStack => state.functions.push(callable),
    }
}

/// Invoke the callable at `func` with two handle arguments.
///
/// The callable is resolved from the namespace matching the placement
/// policy; arguments always resolve through the handle table, with
/// [`NO_VALUE`] meaning "no argument". The result is allocated under a new
/// handle, or reported as [`NO_VALUE`] when the callable produced nothing.
pub fn invoke(
    state: &mut BridgeState,
    func: Handle,
    a: Handle,
    b: Handle,
) -> Result<Handle, HostError> {
    let callable = match state.placement {
        FunctionPlacement::ObjectTable => state.table.resolve_callable(func)?.clone(),
        FunctionPlacement::CallStack => state.functions.resolve(func)?.clone(),
    };
    let result = {
        let a = resolve_arg(&state.table, a)?;
        let b = resolve_arg(&state.table, b)?;
        callable.call(a, b)?
    };
    match result {
        Some(value) => state.table.allocate(value),
        None => Ok(NO_VALUE),
    }
}

fn resolve_arg(table: &HandleTable, handle: Handle) -> Result<Option<&HostValue>, HostError> {
    if handle == NO_VALUE {
        Ok(None)
    } else {
        table.resolve(handle).map(Some)
    }
}

/// Reclaim `handle`. Pass-through to the handle table.
pub fn free(state: &mut BridgeState, handle: Handle) -> Result<(), HostError> {
    state.table.free(handle)
}

/// Box an i32 under a new handle.
pub fn store_int(state: &mut BridgeState, value: i32) -> Result<Handle, HostError> {
    state.table.allocate(HostValue::Int(value))
}

/// Unbox the i32 at `handle`.
pub fn load_int(state: &BridgeState, handle: Handle) -> Result<i32, HostError> {
    state.table.resolve(handle)?.expect_int(handle)
}

/// Box an f32 under a new handle.
pub fn store_float(state: &mut BridgeState, value: f32) -> Result<Handle, HostError> {
    state.table.allocate(HostValue::Float(value))
}

/// Unbox the f32 at `handle`.
pub fn load_float(state: &BridgeState, handle: Handle) -> Result<f32, HostError> {
    state.table.resolve(handle)?.expect_float(handle)
}

/// Box an f64 under a new handle.
pub fn store_double(state: &mut BridgeState, value: f64) -> Result<Handle, HostError> {
    state.table.allocate(HostValue::Double(value))
}

/// Unbox the f64 at `handle`.
pub fn load_double(state: &BridgeState, handle: Handle) -> Result<f64, HostError> {
    state.table.resolve(handle)?.expect_double(handle)
}

/// Decode a `(ptr, len)` UTF-8 buffer and record it as a guest log line.
pub fn guest_say(
    state: &mut BridgeState,
    mem: &[u8],
    ptr: u32,
    len: u32,
) -> Result<(), HostError> {
    let bytes = memory::read_bytes(mem, ptr, len)?;
    let message = String::from_utf8(bytes).map_err(|_| HostError::InvalidEncoding)?;
    state.record_log(message);
    Ok(())
}
