// WBR - wbr-host
// Module: Import Configuration
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Import configuration.
//!
//! An [`ImportConfig`] maps namespace names to import names to bound values.
//! Bound values are plain [`wasmtime::Extern`]s and must be created in the
//! store of the bridge they are handed to (see
//! [`crate::ModuleBridge::store_mut`]).

use std::collections::BTreeMap;

use wasmtime::{Extern, Memory};

/// Namespace the built-in host functions and the default memory live in
pub const ENV_NAMESPACE: &str = "env";

/// Import name of the linear memory
pub const MEMORY_IMPORT: &str = "memory";

/// Import name of the built-in logging function
pub const CONSOLE_LOG_IMPORT: &str = "console.log";

/// Import name of the built-in trap function
pub const ABORT_IMPORT: &str = "abort";

/// Bindings of one namespace
pub type Namespace = BTreeMap<String, Extern>;

/// Caller-supplied import bindings, grouped by namespace
#[derive(Debug, Clone, Default)]
pub struct ImportConfig {
    namespaces: BTreeMap<String, Namespace>,
}

impl ImportConfig {
    /// Create an empty configuration
    #[must_use]
    pub fn new() -> Self {
        Self { namespaces: BTreeMap::new() }
    }

    /// Bind `name` in `namespace`, replacing any previous binding
    pub fn define(
        &mut self,
        namespace: &str,
        name: &str,
        item: impl Into<Extern>,
    ) -> &mut Self {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(name.to_string(), item.into());
        self
    }

    /// Builder form of [`ImportConfig::define`]
    #[must_use]
    pub fn with(mut self, namespace: &str, name: &str, item: impl Into<Extern>) -> Self {
        self.define(namespace, name, item);
        self
    }

    /// Look up a binding
    #[must_use]
    pub fn get(&self, namespace: &str, name: &str) -> Option<&Extern> {
        self.namespaces.get(namespace).and_then(|bindings| bindings.get(name))
    }

    /// Check if a binding exists
    #[must_use]
    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.get(namespace, name).is_some()
    }

    /// Bindings of one namespace
    #[must_use]
    pub fn namespace(&self, namespace: &str) -> Option<&Namespace> {
        self.namespaces.get(namespace)
    }

    /// The memory bound as `env.memory`, if that binding is a memory
    #[must_use]
    pub fn env_memory(&self) -> Option<Memory> {
        self.get(ENV_NAMESPACE, MEMORY_IMPORT).and_then(|item| item.clone().into_memory())
    }

    /// Bind `memory` as `env.memory` unless the caller already bound that
    /// name. Returns `true` when the binding was injected.
    ///
    /// A non-memory value bound under `env.memory` is left alone; linking
    /// will reject it if the module expects a memory there.
    pub fn ensure_env_memory(&mut self, memory: Memory) -> bool {
        if self.contains(ENV_NAMESPACE, MEMORY_IMPORT) {
            return false;
        }
        self.define(ENV_NAMESPACE, MEMORY_IMPORT, memory);
        true
    }

    /// Iterate over all bindings as `(namespace, name, item)`
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Extern)> {
        self.namespaces.iter().flat_map(|(namespace, bindings)| {
            bindings.iter().map(move |(name, item)| (namespace.as_str(), name.as_str(), item))
        })
    }

    /// Total number of bindings
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.values().map(BTreeMap::len).sum()
    }

    /// Whether no binding is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use wasmtime::{Engine, Func, MemoryType, Store};

    use super::*;

    #[test]
    fn ensure_env_memory_injects_once() {
        let engine = Engine::default();
        let mut store = Store::new(&engine, ());
        let default = Memory::new(&mut store, MemoryType::new(1, None)).unwrap();
        let other = Memory::new(&mut store, MemoryType::new(2, None)).unwrap();

        let mut imports = ImportConfig::new();
        assert!(imports.env_memory().is_none());
        assert!(imports.ensure_env_memory(default));
        assert_eq!(imports.env_memory().unwrap().size(&store), 1);

        assert!(!imports.ensure_env_memory(other));
        assert_eq!(imports.env_memory().unwrap().size(&store), 1);
    }

    #[test]
    fn caller_memory_is_kept() {
        let engine = Engine::default();
        let mut store = Store::new(&engine, ());
        let default = Memory::new(&mut store, MemoryType::new(1, None)).unwrap();
        let own = Memory::new(&mut store, MemoryType::new(3, None)).unwrap();

        let mut imports = ImportConfig::new().with(ENV_NAMESPACE, MEMORY_IMPORT, own);
        assert!(!imports.ensure_env_memory(default));
        assert_eq!(imports.env_memory().unwrap().size(&store), 3);
    }

    #[test]
    fn iter_visits_every_namespace() {
        let engine = Engine::default();
        let mut store = Store::new(&engine, ());
        let nop = Func::wrap(&mut store, || {});

        let imports = ImportConfig::new()
            .with(ENV_NAMESPACE, "seed", nop)
            .with("math", "nop", nop)
            .with("math", "nop2", nop);

        let names: Vec<(&str, &str)> = imports.iter().map(|(ns, name, _)| (ns, name)).collect();
        assert_eq!(names, vec![("env", "seed"), ("math", "nop"), ("math", "nop2")]);
        assert_eq!(imports.len(), 3);
        assert!(imports.namespace("math").is_some());
        assert!(imports.env_memory().is_none());
    }
}
