//! Per-session mutable state held in the wasmtime `Store`.
//!
//! `BridgeState` bundles the handle table, the call stack, the callable
//! factory, and captured guest log lines into the struct that lives inside
//! `Store<BridgeState>` for the lifetime of one guest instance. Multiple
//! instances each own their state, so sessions stay isolable.

use std::sync::Arc;

use wasmtime::{StoreLimits, StoreLimitsBuilder};

use gangway_hostapi::{CallStack, CallableFactory, HandleTable};

use crate::config::{BridgeConfig, FunctionPlacement};

/// Linear memory page size in bytes.
pub const PAGE_SIZE: usize = 65536;

/// Per-session mutable state held in the wasmtime `Store`.
pub struct BridgeState {
    /// Handle table for host-owned values.
    pub table: HandleTable,
    /// Push-only callable namespace (used under `CallStack` placement).
    pub functions: CallStack,
    /// Host-supplied callable factory behind `func_new`.
    pub factory: Arc<dyn CallableFactory>,
    /// Where constructed callables are placed.
    pub placement: FunctionPlacement,
    /// Whether `say` lines are retained in `logs`.
    pub capture_guest_logs: bool,
    /// Guest log lines captured via `say`.
    pub logs: Vec<String>,
    /// Maximum number of captured log lines.
    pub max_log_lines: usize,
    /// Maximum length of a single captured log line in bytes.
    pub max_log_line_len: usize,
    /// Wasmtime resource limits (linear memory growth bound).
    pub limits: StoreLimits,
}

impl BridgeState {
    /// Create session state from a config and a callable factory.
    pub fn new(factory: Arc<dyn CallableFactory>, config: &BridgeConfig) -> Self {
        let limits = StoreLimitsBuilder::new()
            .memory_size(config.max_memory_pages as usize * PAGE_SIZE)
            .build();
        Self {
            table: HandleTable::new(),
            functions: CallStack::new(),
            factory,
            placement: config.placement,
            capture_guest_logs: config.capture_guest_logs,
            logs: Vec::new(),
            max_log_lines: config.max_log_lines as usize,
            max_log_line_len: config.max_log_line_len,
            limits,
        }
    }

    /// Record a guest log line. Oversized lines and lines past the cap are
    /// silently dropped from capture; tracing always sees the message.
    pub fn record_log(&mut self, message: String) {
        tracing::info!(guest_message = %message, "guest say");
        if !self.capture_guest_logs {
            return;
        }
        if message.len() > self.max_log_line_len {
            return;
        }
        if self.logs.len() >= self.max_log_lines {
            return;
        }
        self.logs.push(message);
    }
}
