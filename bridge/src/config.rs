//! Bridge configuration.

/// Placement policy for callables built by `func_new`.
///
/// The two namespaces are not interchangeable: only object-table handles
/// participate in `object_free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FunctionPlacement {
    /// Callables share the handle table with every other value and are
    /// reclaimed with `object_free`.
    #[default]
    ObjectTable,
    /// Callables are appended to a separate push-only stack; positions are
    /// monotonic and never reclaimed.
    CallStack,
}

/// Configuration for a bridge session.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Maximum linear memory pages (1 page = 64 KiB).
    /// Default: 256 pages = 16 MiB.
    pub max_memory_pages: u32,

    /// Where `func_new` places constructed callables.
    pub placement: FunctionPlacement,

    /// Whether `say` lines are retained in the session state in addition to
    /// being traced.
    pub capture_guest_logs: bool,

    /// Maximum number of captured log lines per session.
    pub max_log_lines: u32,

    /// Maximum length of a single captured log line in bytes.
    pub max_log_line_len: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_memory_pages: 256, // 16 MiB
            placement: FunctionPlacement::default(),
            capture_guest_logs: false,
            max_log_lines: 256,
            max_log_line_len: 1024,
        }
    }
}
