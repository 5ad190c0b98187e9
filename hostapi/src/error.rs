//! Host-side error types for the Gangway bridge.
//!
//! `HostError` is the error type shared by the handle table, the callable
//! capability, and the marshalling layer. Every variant carries enough
//! context to identify the failing operation and the handle or pointer
//! involved, since an error here aborts the triggering guest→host call.

use crate::value::ValueKind;

/// Host-side error surfaced to the guest as a trap.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    /// A handle that was never allocated, or was already freed.
    #[error("stale or unallocated handle {0}")]
    StaleHandle(u32),

    /// A handle resolved to a value of the wrong variant for the call site.
    #[error("handle {handle} holds {found}, expected {expected}")]
    WrongKind {
        handle: u32,
        expected: ValueKind,
        found: ValueKind,
    },

    /// A pointer/length pair describing a range outside linear memory.
    #[error("range [{ptr}, {ptr}+{len}) exceeds linear memory size {size}")]
    OutOfBounds { ptr: u32, len: u64, size: usize },

    /// A buffer that does not decode as the expected text encoding.
    #[error("text buffer has invalid encoding")]
    InvalidEncoding,

    /// The handle index space below the sentinel is exhausted.
    #[error("handle table exhausted")]
    TableFull,

    /// The callable factory rejected the source text.
    #[error("function construction failed: {0}")]
    ConstructFailed(String),

    /// A host callable failed while being invoked on behalf of the guest.
    #[error("host function call failed: {0}")]
    CallFailed(String),
}
