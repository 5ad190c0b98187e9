//! Guest module validation — ABI compatibility checks.
//!
//! Validates that a compiled module meets the bridge ABI before it can be
//! instantiated. Checks:
//!
//! 1. Required entry exports present with correct signatures
//! 2. All imports come from the `env` module
//! 3. No WASI imports
//! 4. Memory export present

use wasmtime::{ExternType, Module, ValType};

use crate::error::BridgeError;

/// Check if a ValType is i32.
fn is_i32(vt: &ValType) -> bool {
    matches!(vt, ValType::I32)
}

/// Expected entry exports: (name, i32 param count, i32 result count).
const REQUIRED_EXPORTS: &[(&str, usize, usize)] = &[
    ("start", 0, 0),
    ("wake", 2, 0),
];

/// Allowed import module name.
const ALLOWED_IMPORT_MODULE: &str = "env";

/// Validate that a module meets the bridge ABI.
pub fn validate_module(module: &Module) -> Result<(), BridgeError> {
    validate_exports(module)?;
    validate_imports(module)?;
    Ok(())
}

/// Check that all required exports are present with correct signatures.
fn validate_exports(module: &Module) -> Result<(), BridgeError> {
    let has_memory = module
        .exports()
        .any(|e| e.name() == "memory" && matches!(e.ty(), ExternType::Memory(_)));
    if !has_memory {
        return Err(BridgeError::Validation(
            "module must export 'memory'".into(),
        ));
    }

    for &(name, expected_param_count, expected_result_count) in REQUIRED_EXPORTS {
        let export = module
            .exports()
            .find(|e| e.name() == name)
            .ok_or_else(|| {
                BridgeError::Validation(format!("missing required export: {}", name))
            })?;

        let func_ty = match export.ty() {
            ExternType::Func(ft) => ft,
            _ => {
                return Err(BridgeError::Validation(format!(
                    "export '{}' must be a function",
                    name
                )));
            }
        };

        let params: Vec<ValType> = func_ty.params().collect();
        let results: Vec<ValType> = func_ty.results().collect();

        if params.len() != expected_param_count || !params.iter().all(is_i32) {
            return Err(BridgeError::Validation(format!(
                "export '{}' has wrong param signature: expected {} i32 params, got {} params",
                name,
                expected_param_count,
                params.len()
            )));
        }

        if results.len() != expected_result_count || !results.iter().all(is_i32) {
            return Err(BridgeError::Validation(format!(
                "export '{}' has wrong result signature: expected {} i32 results, got {} results",
                name,
                expected_result_count,
                results.len()
            )));
        }
    }

    Ok(())
}

/// Check that all imports are functions from `env` and none are WASI.
fn validate_imports(module: &Module) -> Result<(), BridgeError> {
    for import in module.imports() {
        let module_name = import.module();

        if module_name.starts_with("wasi") {
            return Err(BridgeError::Validation(format!(
                "WASI import not allowed: {}::{}",
                module_name,
                import.name()
            )));
        }

        if module_name != ALLOWED_IMPORT_MODULE {
            return Err(BridgeError::Validation(format!(
                "import from unknown module '{}' (only '{}' allowed): {}",
                module_name,
                ALLOWED_IMPORT_MODULE,
                import.name()
            )));
        }

        if !matches!(import.ty(), ExternType::Func(_)) {
            return Err(BridgeError::Validation(format!(
                "non-function import not allowed: {}::{}",
                module_name,
                import.name()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasmtime::Engine;

    fn test_engine() -> Engine {
        Engine::default()
    }

    #[test]
    fn test_validate_minimal_valid_module() {
        let wat = r#"
            (module
                (memory (export "memory") 1)
                (func (export "start"))
                (func (export "wake") (param i32 i32))
            )
        "#;
        let engine = test_engine();
        let module = Module::new(&engine, wat).unwrap();
        validate_module(&module).unwrap();
    }

    #[test]
    fn test_reject_missing_export() {
        let wat = r#"
            (module
                (memory (export "memory") 1)
                (func (export "start"))
                ;; Missing wake
            )
        "#;
        let engine = test_engine();
        let module = Module::new(&engine, wat).unwrap();
        let err = validate_module(&module).unwrap_err();
        assert!(matches!(err, BridgeError::Validation(_)));
    }

    #[test]
    fn test_reject_wrong_signature() {
        let wat = r#"
            (module
                (memory (export "memory") 1)
                ;; Wrong signature: start should take no params
                (func (export "start") (param i32))
                (func (export "wake") (param i32 i32))
            )
        "#;
        let engine = test_engine();
        let module = Module::new(&engine, wat).unwrap();
        let err = validate_module(&module).unwrap_err();
        assert!(matches!(err, BridgeError::Validation(_)));
    }

    #[test]
    fn test_reject_missing_memory() {
        let wat = r#"
            (module
                (func (export "start"))
                (func (export "wake") (param i32 i32))
            )
        "#;
        let engine = test_engine();
        let module = Module::new(&engine, wat).unwrap();
        let err = validate_module(&module).unwrap_err();
        assert!(matches!(err, BridgeError::Validation(_)));
    }

    #[test]
    fn test_reject_wasi_import() {
        let wat = r#"
            (module
                (import "wasi_snapshot_preview1" "fd_write"
                    (func (param i32 i32 i32 i32) (result i32)))
                (memory (export "memory") 1)
                (func (export "start"))
                (func (export "wake") (param i32 i32))
            )
        "#;
        let engine = test_engine();
        let module = Module::new(&engine, wat).unwrap();
        let err = validate_module(&module).unwrap_err();
        assert!(matches!(err, BridgeError::Validation(_)));
    }

    #[test]
    fn test_accept_env_import() {
        let wat = r#"
            (module
                (import "env" "text_new" (func (param i32 i32) (result i32)))
                (memory (export "memory") 1)
                (func (export "start"))
                (func (export "wake") (param i32 i32))
            )
        "#;
        let engine = test_engine();
        let module = Module::new(&engine, wat).unwrap();
        validate_module(&module).unwrap();
    }

    #[test]
    fn test_reject_unknown_module_import() {
        let wat = r#"
            (module
                (import "host" "some_func" (func (result i32)))
                (memory (export "memory") 1)
                (func (export "start"))
                (func (export "wake") (param i32 i32))
            )
        "#;
        let engine = test_engine();
        let module = Module::new(&engine, wat).unwrap();
        let err = validate_module(&module).unwrap_err();
        assert!(matches!(err, BridgeError::Validation(_)));
    }
}
