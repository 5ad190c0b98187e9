//! Append-only callable namespace for the stack placement variant.
//!
//! When a session runs with `FunctionPlacement::CallStack`, constructed
//! callables are pushed here instead of entering the handle table, and the
//! value returned to the guest is the push position. Positions are assigned
//! monotonically and never reclaimed — a deliberately simpler namespace than
//! the handle table's reclaiming one.

use std::sync::Arc;

use crate::callable::Callable;
use crate::error::HostError;
use crate::handle_table::{Handle, NO_VALUE};

/// Push-only sequence of constructed callables.
#[derive(Default)]
pub struct CallStack {
    entries: Vec<Arc<dyn Callable>>,
}

impl CallStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a callable and return its position.
    ///
    /// Positions are never reused and never equal [`NO_VALUE`].
    pub fn push(&mut self, callable: Arc<dyn Callable>) -> Result<Handle, HostError> {
        let position = self.entries.len();
        if position as u64 >= NO_VALUE as u64 {
            return Err(HostError::TableFull);
        }
        self.entries.push(callable);
        Ok(position as Handle)
    }

    /// Look up the callable at `position`.
    pub fn resolve(&self, position: Handle) -> Result<&Arc<dyn Callable>, HostError> {
        self.entries
            .get(position as usize)
            .ok_or(HostError::StaleHandle(position))
    }

    /// Number of callables pushed so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CallStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallStack")
            .field("len", &self.entries.len())
            .finish()
    }
}
