// WBR - wbr-host
// Module: Instance Exports
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Exports table of an instantiated module.

use crate::{imports::MEMORY_IMPORT, prelude::*};

/// Name → export mapping, fixed at instantiation
#[derive(Debug, Clone)]
pub struct Exports {
    entries: BTreeMap<String, Extern>,
    linear_memory: Option<Memory>,
}

impl Exports {
    pub(crate) fn collect(
        mut store: impl AsContextMut,
        instance: Instance,
        imported_memory: Option<Memory>,
    ) -> Self {
        let entries: BTreeMap<String, Extern> = instance
            .exports(&mut store)
            .map(|export| (export.name().to_string(), export.into_extern()))
            .collect();
        let linear_memory = entries
            .get(MEMORY_IMPORT)
            .and_then(|item| item.clone().into_memory())
            .or(imported_memory);
        Self { entries, linear_memory }
    }

    /// Export names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Look up an export
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Extern> {
        self.entries.get(name)
    }

    /// Look up an exported function
    #[must_use]
    pub fn func(&self, name: &str) -> Option<Func> {
        self.get(name).and_then(|item| item.clone().into_func())
    }

    /// Look up an exported memory
    #[must_use]
    pub fn memory(&self, name: &str) -> Option<Memory> {
        self.get(name).and_then(|item| item.clone().into_memory())
    }

    /// Memory strings of this instance live in: the exported `memory`, or
    /// the imported `env.memory`
    #[must_use]
    pub fn linear_memory(&self) -> Option<Memory> {
        self.linear_memory
    }

    /// Number of exports
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the module exports nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, export)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Extern)> {
        self.entries.iter().map(|(name, item)| (name.as_str(), item))
    }
}
