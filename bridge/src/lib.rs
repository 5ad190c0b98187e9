//! `gangway-bridge` — wasmtime bridge between guest linear memory and
//! host-owned values.
//!
//! This crate loads a guest module, validates its ABI, and registers the
//! `env` import surface through which guest code:
//!
//! - **Marshals strings and buffers:** UTF-16 text, raw bytes, and 32-bit
//!   words cross the boundary as `(pointer, element-count)` views over the
//!   guest's linear memory, bounds-checked on every call
//! - **Holds handles:** non-primitive values stay host-side in a
//!   [`gangway_hostapi::HandleTable`]; the guest sees small integers
//! - **Calls host capabilities:** source text becomes a callable via a
//!   host-supplied factory, invoked positionally with two handle arguments
//!
//! The primary entry points are [`Bridge::new`] and
//! [`runtime::BridgeSession::start`].

pub mod error;
pub mod config;
pub mod memory;
pub mod state;
pub mod marshal;
pub mod linker;
pub mod validation;
pub mod runtime;

pub use error::BridgeError;
pub use config::{BridgeConfig, FunctionPlacement};
pub use runtime::{Bridge, BridgeSession};
