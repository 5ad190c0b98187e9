//! Shared test helpers for integration tests.
//!
//! Provides a guest module exporting a thin wrapper around every `env`
//! import, callable-factory builders, and UTF-16 buffer helpers used across
//! all integration test files.

#![allow(dead_code)]

use std::sync::Arc;

use gangway_bridge::{Bridge, BridgeConfig, BridgeSession};
use gangway_hostapi::{callable_fn, HostError, HostValue, RegistryFactory};

/// Guest module wrapping each `env` import in an export the host can drive.
pub const DRIVER_GUEST: &str = r#"
    (module
        (import "env" "text_new"    (func $text_new (param i32 i32) (result i32)))
        (import "env" "text_read"   (func $text_read (param i32 i32 i32) (result i32)))
        (import "env" "bytes_new"   (func $bytes_new (param i32 i32) (result i32)))
        (import "env" "bytes_read"  (func $bytes_read (param i32 i32 i32) (result i32)))
        (import "env" "words_new"   (func $words_new (param i32 i32) (result i32)))
        (import "env" "words_read"  (func $words_read (param i32 i32 i32) (result i32)))
        (import "env" "func_new"    (func $func_new (param i32) (result i32)))
        (import "env" "func_call"   (func $func_call (param i32 i32 i32) (result i32)))
        (import "env" "object_free" (func $object_free (param i32)))
        (import "env" "int_new"     (func $int_new (param i32) (result i32)))
        (import "env" "int_get"     (func $int_get (param i32) (result i32)))
        (import "env" "float_new"   (func $float_new (param f32) (result i32)))
        (import "env" "float_get"   (func $float_get (param i32) (result f32)))
        (import "env" "double_new"  (func $double_new (param f64) (result i32)))
        (import "env" "double_get"  (func $double_get (param i32) (result f64)))
        (import "env" "say"         (func $say (param i32 i32)))

        (memory (export "memory") 2)
        (func (export "start"))
        (func (export "wake") (param i32 i32))

        (func (export "do_text_new") (param i32 i32) (result i32)
            local.get 0 local.get 1 call $text_new)
        (func (export "do_text_read") (param i32 i32 i32) (result i32)
            local.get 0 local.get 1 local.get 2 call $text_read)
        (func (export "do_bytes_new") (param i32 i32) (result i32)
            local.get 0 local.get 1 call $bytes_new)
        (func (export "do_bytes_read") (param i32 i32 i32) (result i32)
            local.get 0 local.get 1 local.get 2 call $bytes_read)
        (func (export "do_words_new") (param i32 i32) (result i32)
            local.get 0 local.get 1 call $words_new)
        (func (export "do_words_read") (param i32 i32 i32) (result i32)
            local.get 0 local.get 1 local.get 2 call $words_read)
        (func (export "do_func_new") (param i32) (result i32)
            local.get 0 call $func_new)
        (func (export "do_func_call") (param i32 i32 i32) (result i32)
            local.get 0 local.get 1 local.get 2 call $func_call)
        (func (export "do_object_free") (param i32)
            local.get 0 call $object_free)
        (func (export "do_int_new") (param i32) (result i32)
            local.get 0 call $int_new)
        (func (export "do_int_get") (param i32) (result i32)
            local.get 0 call $int_get)
        (func (export "do_float_new") (param f32) (result i32)
            local.get 0 call $float_new)
        (func (export "do_float_get") (param i32) (result f32)
            local.get 0 call $float_get)
        (func (export "do_double_new") (param f64) (result i32)
            local.get 0 call $double_new)
        (func (export "do_double_get") (param i32) (result f64)
            local.get 0 call $double_get)
        (func (export "do_say") (param i32 i32)
            local.get 0 local.get 1 call $say)
    )
"#;

/// Factory with no registered sources.
pub fn empty_factory() -> Arc<RegistryFactory> {
    Arc::new(RegistryFactory::new())
}

/// Factory with the callables the tests rely on.
pub fn test_factory() -> Arc<RegistryFactory> {
    let mut factory = RegistryFactory::new();
    factory.register("() => 42", callable_fn(|_, _| Ok(Some(HostValue::Int(42)))));
    factory.register("noop", callable_fn(|_, _| Ok(None)));
    factory.register(
        "concat",
        callable_fn(|a, b| {
            let a = a.map(|v| v.expect_text(0)).transpose()?.unwrap_or("");
            let b = b.map(|v| v.expect_text(0)).transpose()?.unwrap_or("");
            Ok(Some(HostValue::Text(format!("{a}{b}"))))
        }),
    );
    factory.register(
        "boom",
        callable_fn(|_, _| Err(HostError::CallFailed("boom".into()))),
    );
    Arc::new(factory)
}

/// Instantiate the driver guest with the given config and factory.
pub fn driver_session(config: BridgeConfig, factory: Arc<RegistryFactory>) -> BridgeSession {
    let bridge = Bridge::new(DRIVER_GUEST.as_bytes(), config).unwrap();
    bridge.instantiate(factory).unwrap()
}

/// Driver session with defaults and the test factory.
pub fn default_session() -> BridgeSession {
    driver_session(BridgeConfig::default(), test_factory())
}

/// Encode a string as UTF-16LE bytes.
pub fn utf16_bytes(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

/// Number of UTF-16 code units in a string.
pub fn utf16_len(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}

/// Write a string into guest memory at `ptr` and return its unit count.
pub fn stage_text(session: &mut BridgeSession, ptr: u32, s: &str) -> u32 {
    session.write_memory(ptr, &utf16_bytes(s)).unwrap();
    utf16_len(s)
}

/// Allocate a string handle by staging it and calling through the guest.
pub fn alloc_text(session: &mut BridgeSession, s: &str) -> u32 {
    let units = stage_text(session, 0, s);
    session.call("do_text_new", (0u32, units)).unwrap()
}

/// Read `units` UTF-16 code units back out of guest memory as a string.
pub fn read_text(session: &mut BridgeSession, ptr: u32, units: u32) -> String {
    let bytes = session.read_memory(ptr, units * 2).unwrap();
    let code_units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16(&code_units).unwrap()
}
