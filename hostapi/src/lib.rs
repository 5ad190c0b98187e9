//! `gangway-hostapi` — host-side building blocks for the Gangway bridge.
//!
//! This crate defines everything the bridge needs on the host side of the
//! guest/host boundary, with no WASM runtime dependency. It provides:
//!
//! - `HostValue` — tagged variant held in a handle slot
//! - `HandleTable` — handle allocation, resolution, and reclamation
//! - `CallStack` — append-only callable namespace (variant placement)
//! - `Callable` / `CallableFactory` traits — pluggable host call capability
//! - `RegistryFactory` — source-text registry factory for tests and hosts
//!   with preregistered scripts
//! - `HostError` — host-side error type surfaced to the guest as traps
//!
//! The `gangway-bridge` crate layers the WASM marshalling protocol on top.

pub mod error;
pub mod value;
pub mod handle_table;
pub mod call_stack;
pub mod callable;

// Re-export commonly used types at the crate root.
pub use error::HostError;
pub use value::{HostValue, ValueKind};
pub use handle_table::{Handle, HandleTable, NO_VALUE};
pub use call_stack::CallStack;
pub use callable::{callable_fn, Callable, CallableFactory, RegistryFactory};
