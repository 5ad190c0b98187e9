//! Bridge error types.

use gangway_hostapi::HostError;

/// Top-level error type for the bridge crate.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Wasmtime engine, compilation, or instantiation error.
    #[error("wasmtime error: {0}")]
    Wasmtime(#[from] anyhow::Error),

    /// Module validation failed (missing exports, bad imports, etc.).
    #[error("validation error: {0}")]
    Validation(String),

    /// Host API error during a bridge operation.
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// Memory operation failed outside a guest call.
    #[error("memory error: {0}")]
    Memory(String),

    /// The guest trapped, including traps raised by failed host calls.
    #[error("guest trapped: {0}")]
    GuestTrapped(String),
}
