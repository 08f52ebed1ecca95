// WBR - wbr-host
// Module: Module Bridge
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! The module bridge.
//!
//! A [`ModuleBridge`] owns one wasmtime store together with the default
//! memory allocated in it. Modules are acquired through the bridge's engine
//! and instantiated into its store, linked against the caller's imports, the
//! enabled ambient bindings and the built-ins.

use crate::{
    acquire::{self, CompiledModule},
    builtins::{self, BridgeState},
    config::BridgeConfig,
    exports::Exports,
    imports::{ImportConfig, ENV_NAMESPACE, MEMORY_IMPORT},
    prelude::*,
    source::{ModuleLocator, ModuleSource},
};

/// Turn an error that crossed the wasm boundary into a bridge error.
///
/// Errors raised by host functions come back as-is; traps become runtime
/// traps; anything else is handed to `other`.
fn classify(error: &wasmtime::Error, other: impl FnOnce(String) -> Error) -> Error {
    if let Some(error) = error.downcast_ref::<Error>() {
        return error.clone();
    }
    match error.downcast_ref::<Trap>() {
        Some(Trap::OutOfFuel) => Error::new(
            ErrorCategory::RuntimeTrap,
            codes::FUEL_EXHAUSTED,
            format!("{error:#}"),
        ),
        Some(_) => Error::runtime_trap(format!("{error:#}")),
        None => other(format!("{error:#}")),
    }
}

/// Loads, links and runs WebAssembly modules
pub struct ModuleBridge {
    engine: Engine,
    store: Store<BridgeState>,
    arbiter: MemoryArbiter,
    config: BridgeConfig,
}

impl fmt::Debug for ModuleBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleBridge")
            .field("config", &self.config)
            .field("arbiter", &self.arbiter)
            .field("state", self.store.data())
            .finish_non_exhaustive()
    }
}

impl ModuleBridge {
    /// Create a bridge with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(BridgeConfig::default())
    }

    /// Create a bridge with its own engine built from `config`
    pub fn with_config(config: BridgeConfig) -> Result<Self> {
        let engine = config.engine()?;
        Self::with_engine(&engine, config)
    }

    /// Create a bridge sharing `engine`.
    ///
    /// The engine must have been built with fuel metering enabled when
    /// `config.fuel` is set (see [`BridgeConfig::engine`]).
    pub fn with_engine(engine: &Engine, config: BridgeConfig) -> Result<Self> {
        config.validate()?;
        let state = BridgeState::new(LogHandlers::with_stderr(), config.console_level);
        let mut store = Store::new(engine, state);
        if let Some(fuel) = config.fuel {
            store.set_fuel(fuel).map_err(|e| {
                Error::new(
                    ErrorCategory::Runtime,
                    codes::ENGINE_ERROR,
                    format!("failed to set fuel budget: {e:#}"),
                )
            })?;
        }
        let arbiter = MemoryArbiter::new(&mut store)?;
        Ok(Self { engine: engine.clone(), store, arbiter, config })
    }

    /// The engine modules are compiled with
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The configuration the bridge was created with
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The store instances live in
    #[must_use]
    pub fn store(&self) -> &Store<BridgeState> {
        &self.store
    }

    /// Mutable store access; import values must be created through this
    /// store
    pub fn store_mut(&mut self) -> &mut Store<BridgeState> {
        &mut self.store
    }

    /// The default memory injected as `env.memory`
    #[must_use]
    pub fn default_memory(&self) -> Memory {
        self.arbiter.memory()
    }

    /// Replace every console handler with `handler`
    pub fn on_console<F>(&mut self, handler: F)
    where
        F: Fn(&LogOperation) + Send + Sync + 'static,
    {
        self.store.data_mut().console_mut().replace(handler);
    }

    /// Compile the module behind `source`
    pub fn acquire(&self, source: &dyn ModuleSource) -> Result<CompiledModule> {
        acquire::acquire(&self.engine, source, self.config.fallback)
    }

    /// Compile the module at `locator` (path or URL)
    pub fn acquire_locator(&self, locator: &str) -> Result<CompiledModule> {
        let source = ModuleLocator::parse(locator)?.open()?;
        self.acquire(source.as_ref())
    }

    /// Instantiate `module`.
    ///
    /// When `imports` has no `env.memory`, the default memory is bound there
    /// first, so `imports` reflects what the module was linked against.
    pub fn instantiate(
        &mut self,
        module: &CompiledModule,
        imports: &mut ImportConfig,
    ) -> Result<Exports> {
        if imports.ensure_env_memory(self.arbiter.memory()) {
            debug!("bound default memory as env.memory");
        }
        let imported_memory = if module.imports(ENV_NAMESPACE, MEMORY_IMPORT) {
            imports.env_memory()
        } else {
            None
        };

        let mut linker = Linker::new(&self.engine);
        linker.allow_shadowing(true);
        self.config.ambient_scope().define(&mut linker)?;
        for (namespace, name, item) in imports.iter() {
            linker.define(&self.store, namespace, name, item.clone()).map_err(|e| {
                Error::new(
                    ErrorCategory::Linkage,
                    codes::IMPORT_DEFINITION_ERROR,
                    format!("failed to define `{namespace}.{name}`: {e:#}"),
                )
            })?;
        }
        builtins::define(&mut linker, imported_memory, module.locator())?;

        let instance = linker
            .instantiate(&mut self.store, module.module())
            .map_err(|e| classify(&e, Error::linkage))?;
        let exports = Exports::collect(&mut self.store, instance, imported_memory);
        info!(locator = module.locator(), exports = exports.len(), "instantiated module");
        Ok(exports)
    }

    /// Instantiate `module` with nothing but the default memory and built-ins
    pub fn instantiate_default(&mut self, module: &CompiledModule) -> Result<Exports> {
        let mut imports = ImportConfig::new();
        self.instantiate(module, &mut imports)
    }

    /// Call the exported function `name` with `args`
    pub fn call(&mut self, exports: &Exports, name: &str, args: &[Val]) -> Result<Vec<Val>> {
        let func = exports.func(name).ok_or_else(|| Error::export_not_found(name))?;
        // Placeholders only; the call overwrites every slot.
        let mut results = vec![Val::I32(0); func.ty(&self.store).results().len()];
        trace!(export = name, args = args.len(), "calling export");
        func.call(&mut self.store, args, &mut results).map_err(|e| classify(&e, Error::runtime_error))?;
        Ok(results)
    }

    /// Typed handle of the exported function `name`
    pub fn typed<P, R>(&self, exports: &Exports, name: &str) -> Result<TypedFunc<P, R>>
    where
        P: WasmParams,
        R: WasmResults,
    {
        let func = exports.func(name).ok_or_else(|| Error::export_not_found(name))?;
        func.typed::<P, R>(&self.store).map_err(|e| {
            Error::new(
                ErrorCategory::Runtime,
                codes::EXPORT_TYPE_MISMATCH,
                format!("export `{name}` has a different signature: {e:#}"),
            )
        })
    }

    /// Call a typed function in this bridge's store
    pub fn call_typed<P, R>(&mut self, func: &TypedFunc<P, R>, params: P) -> Result<R>
    where
        P: WasmParams,
        R: WasmResults,
    {
        func.call(&mut self.store, params).map_err(|e| classify(&e, Error::runtime_error))
    }

    /// Lift a string an export returned a pointer to
    pub fn lift_string(&self, exports: &Exports, pointer: u32) -> Result<Option<String>> {
        let memory = exports.linear_memory();
        lift_string(memory.map(|memory| memory.data(&self.store)), pointer)
    }

    /// Remaining fuel, `None` when metering is off
    #[must_use]
    pub fn fuel_remaining(&self) -> Option<u64> {
        self.config.fuel.and_then(|_| self.store.get_fuel().ok())
    }

    /// Refill the fuel budget
    pub fn set_fuel(&mut self, fuel: u64) -> Result<()> {
        self.store.set_fuel(fuel).map_err(|e| {
            Error::new(ErrorCategory::Runtime, codes::ENGINE_ERROR, format!("{e:#}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}

    #[test]
    fn bridge_is_send() {
        assert_send::<ModuleBridge>();
    }

    #[test]
    fn default_memory_exists_before_any_module() {
        let bridge = ModuleBridge::new().unwrap();
        let memory = bridge.default_memory();
        assert_eq!(memory.size(bridge.store()), u64::from(wbr_memory::DEFAULT_MEMORY_PAGES));
        assert_eq!(bridge.fuel_remaining(), None);
    }

    #[test]
    fn host_errors_survive_classification() {
        let original = Error::module_trap("boom in file.wasm:3:7");
        let wrapped = wasmtime::Error::from(original.clone()).context("wasm backtrace");
        assert_eq!(classify(&wrapped, Error::runtime_error), original);

        let trap = wasmtime::Error::from(Trap::OutOfFuel);
        assert!(classify(&trap, Error::runtime_error).is_fuel_exhausted());

        let other = wasmtime::Error::msg("unknown import");
        assert!(classify(&other, Error::linkage).is_linkage_error());
    }
}
