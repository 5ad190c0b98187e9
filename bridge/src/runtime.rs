//! Bridge runtime — wasmtime engine, module loading, and session lifecycle.
//!
//! [`Bridge`] compiles and validates a guest module once; each
//! [`Bridge::instantiate`] call produces an isolated [`BridgeSession`] with
//! its own store, handle table, and import surface. The guest's entry points
//! (`start`, `wake`) and any further exports are invoked through the session.
//!
//! Every marshalling operation is synchronous and runs to completion before
//! the guest resumes; an unbounded host callable therefore stalls the whole
//! bridge. That is an accepted limitation of the synchronous host-call
//! model, not something this layer works around.

use std::path::Path;
use std::sync::Arc;

use wasmtime::{Config, Engine, Instance, Linker, Module, Store, WasmParams, WasmResults};

use gangway_hostapi::CallableFactory;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::linker::register_host_functions;
use crate::memory;
use crate::state::BridgeState;
use crate::validation::validate_module;

/// A compiled, validated guest module ready to instantiate.
pub struct Bridge {
    engine: Engine,
    module: Module,
    config: BridgeConfig,
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Bridge {
    /// Compile a guest module from a byte buffer and validate its ABI.
    pub fn new(wasm_bytes: &[u8], config: BridgeConfig) -> Result<Self, BridgeError> {
        let engine = create_engine()?;
        let module = Module::new(&engine, wasm_bytes)?;
        validate_module(&module)?;
        Ok(Self {
            engine,
            module,
            config,
        })
    }

    /// Load from a `.wasm` (or `.wat`) file path.
    pub fn from_file(path: &Path, config: BridgeConfig) -> Result<Self, BridgeError> {
        let engine = create_engine()?;
        let module = Module::from_file(&engine, path)?;
        validate_module(&module)?;
        Ok(Self {
            engine,
            module,
            config,
        })
    }

    /// Instantiate the module with a fresh store and the given callable
    /// factory behind `func_new`.
    pub fn instantiate(
        &self,
        factory: Arc<dyn CallableFactory>,
    ) -> Result<BridgeSession, BridgeError> {
        let state = BridgeState::new(factory, &self.config);
        let mut store = Store::new(&self.engine, state);
        store.limiter(|state| &mut state.limits);

        let mut linker = Linker::new(&self.engine);
        register_host_functions(&mut linker)?;

        let instance = linker.instantiate(&mut store, &self.module)?;
        Ok(BridgeSession { store, instance })
    }
}

/// One live guest instance with its store, handle table, and memory.
pub struct BridgeSession {
    store: Store<BridgeState>,
    instance: Instance,
}

impl BridgeSession {
    /// Run the guest's `start` entry.
    pub fn start(&mut self) -> Result<(), BridgeError> {
        self.call::<(), ()>("start", ())
    }

    /// Run the guest's `wake` resumption entry.
    pub fn wake(&mut self, promise: i32, result: i32) -> Result<(), BridgeError> {
        self.call::<(i32, i32), ()>("wake", (promise, result))
    }

    /// Invoke an arbitrary typed guest export.
    ///
    /// Guest traps — including traps raised by failed host calls — surface
    /// as [`BridgeError::GuestTrapped`] carrying the diagnostic chain.
    pub fn call<P, R>(&mut self, name: &str, params: P) -> Result<R, BridgeError>
    where
        P: WasmParams,
        R: WasmResults,
    {
        let func = self
            .instance
            .get_typed_func::<P, R>(&mut self.store, name)?;
        func.call(&mut self.store, params)
            .map_err(|e| BridgeError::GuestTrapped(format!("{e:#}")))
    }

    /// Read bytes out of the guest's linear memory.
    pub fn read_memory(&mut self, ptr: u32, len: u32) -> Result<Vec<u8>, BridgeError> {
        let mem = self.guest_memory()?;
        let data = mem.data(&self.store);
        Ok(memory::read_bytes(data, ptr, len)?)
    }

    /// Write bytes into the guest's linear memory.
    pub fn write_memory(&mut self, ptr: u32, data: &[u8]) -> Result<(), BridgeError> {
        let mem = self.guest_memory()?;
        let slice = mem.data_mut(&mut self.store);
        Ok(memory::write_bytes(slice, ptr, data)?)
    }

    /// The session's bridge state (handle table, captured logs).
    pub fn state(&self) -> &BridgeState {
        self.store.data()
    }

    /// Mutable access to the session's bridge state.
    pub fn state_mut(&mut self) -> &mut BridgeState {
        self.store.data_mut()
    }

    /// Guest log lines captured via `say`.
    pub fn logs(&self) -> &[String] {
        &self.store.data().logs
    }

    fn guest_memory(&mut self) -> Result<wasmtime::Memory, BridgeError> {
        self.instance
            .get_memory(&mut self.store, "memory")
            .ok_or_else(|| BridgeError::Memory("no memory export".into()))
    }
}

/// Create a wasmtime engine for the single-threaded synchronous bridge.
fn create_engine() -> Result<Engine, BridgeError> {
    let mut wasm_config = Config::new();
    wasm_config.wasm_threads(false);
    Ok(Engine::new(&wasm_config)?)
}
