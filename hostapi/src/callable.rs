//! The host call capability — traits at the dynamic-construction seam.
//!
//! The original system built callables from source text at runtime, a
//! capability tied to the host's own execution model. Here it is a pluggable
//! seam: the bridge hands source text to a host-supplied [`CallableFactory`]
//! and stores whatever [`Callable`] comes back. The bridge never interprets
//! source text itself.
//!
//! [`RegistryFactory`] is the in-crate implementation: a table of
//! preregistered source strings. It serves hosts whose scripts are known
//! ahead of time, and every test in the workspace.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::HostError;
use crate::value::HostValue;

/// A host function invocable from the guest with up to two value arguments.
///
/// Returning `Ok(None)` means "no result"; the bridge reports it to the
/// guest as the reserved sentinel handle instead of allocating a slot.
pub trait Callable: Send + Sync {
    fn call(
        &self,
        a: Option<&HostValue>,
        b: Option<&HostValue>,
    ) -> Result<Option<HostValue>, HostError>;
}

impl<F> Callable for F
where
    F: Fn(Option<&HostValue>, Option<&HostValue>) -> Result<Option<HostValue>, HostError>
        + Send
        + Sync,
{
    fn call(
        &self,
        a: Option<&HostValue>,
        b: Option<&HostValue>,
    ) -> Result<Option<HostValue>, HostError> {
        self(a, b)
    }
}

impl std::fmt::Debug for dyn Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<callable>")
    }
}

/// Wrap a closure as a shared [`Callable`].
pub fn callable_fn<F>(f: F) -> Arc<dyn Callable>
where
    F: Fn(Option<&HostValue>, Option<&HostValue>) -> Result<Option<HostValue>, HostError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Builds a [`Callable`] from source text on behalf of the guest.
///
/// Implementations decide what "source text" means — an embedded scripting
/// engine, a lookup of precompiled host functions, anything. Construction
/// failure must be reported via `ConstructFailed`; the bridge will not
/// allocate a handle for a failed construction.
pub trait CallableFactory: Send + Sync {
    fn construct(&self, source: &str) -> Result<Arc<dyn Callable>, HostError>;
}

/// Factory backed by a registry of known source strings.
///
/// `construct` succeeds only for exactly-registered source text. BTreeMap
/// keeps iteration deterministic for debugging.
#[derive(Default)]
pub struct RegistryFactory {
    entries: BTreeMap<String, Arc<dyn Callable>>,
}

impl RegistryFactory {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register `callable` under `source`, replacing any previous entry.
    pub fn register(&mut self, source: impl Into<String>, callable: Arc<dyn Callable>) {
        self.entries.insert(source.into(), callable);
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CallableFactory for RegistryFactory {
    fn construct(&self, source: &str) -> Result<Arc<dyn Callable>, HostError> {
        self.entries
            .get(source)
            .cloned()
            .ok_or_else(|| HostError::ConstructFailed(format!("unknown source: {source:?}")))
    }
}

impl std::fmt::Debug for RegistryFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryFactory")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_callable() {
        let double = callable_fn(|a, _| {
            let v = a.map(|v| v.expect_int(0)).transpose()?.unwrap_or(0);
            Ok(Some(HostValue::Int(v * 2)))
        });
        let out = double.call(Some(&HostValue::Int(21)), None).unwrap();
        assert!(matches!(out, Some(HostValue::Int(42))));
    }

    #[test]
    fn test_registry_constructs_known_source() {
        let mut factory = RegistryFactory::new();
        factory.register("() => 42", callable_fn(|_, _| Ok(Some(HostValue::Int(42)))));
        let callable = factory.construct("() => 42").unwrap();
        let out = callable.call(None, None).unwrap();
        assert!(matches!(out, Some(HostValue::Int(42))));
    }

    #[test]
    fn test_registry_rejects_unknown_source() {
        let factory = RegistryFactory::new();
        let err = factory.construct("nope").unwrap_err();
        assert!(matches!(err, HostError::ConstructFailed(_)));
    }

    #[test]
    fn test_registry_replaces_entry() {
        let mut factory = RegistryFactory::new();
        factory.register("f", callable_fn(|_, _| Ok(Some(HostValue::Int(1)))));
        factory.register("f", callable_fn(|_, _| Ok(Some(HostValue::Int(2)))));
        assert_eq!(factory.len(), 1);
        let out = factory.construct("f").unwrap().call(None, None).unwrap();
        assert!(matches!(out, Some(HostValue::Int(2))));
    }
}
