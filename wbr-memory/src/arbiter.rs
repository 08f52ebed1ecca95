// WBR - wbr-memory
// Module: Memory Arbiter
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Default linear memory.
//!
//! The arbiter allocates its memory as soon as it is constructed, so the
//! default memory exists before any module is acquired. wasmtime memories
//! are confined to the store that created them, so there is one arbiter per
//! store and every instantiation performed through that store shares it.

use tracing::debug;
use wasmtime::{AsContext, AsContextMut, Memory, MemoryType};
use wbr_error::{codes, Error, ErrorCategory, Result};

/// Initial size of the default memory, in pages
pub const DEFAULT_MEMORY_PAGES: u32 = 1;

/// Size of one WebAssembly page in bytes
pub const WASM_PAGE_SIZE: usize = 64 * 1024;

/// Owner of the default linear memory
#[derive(Debug, Clone, Copy)]
pub struct MemoryArbiter {
    memory: Memory,
}

impl MemoryArbiter {
    /// Allocate the default memory in `store`.
    ///
    /// Fails only when the store refuses the allocation (e.g. a resource
    /// limiter is installed).
    pub fn new(mut store: impl AsContextMut) -> Result<Self> {
        let memory = Memory::new(&mut store, Self::default_type()).map_err(|e| {
            Error::new(
                ErrorCategory::Memory,
                codes::MEMORY_ALLOCATION_ERROR,
                format!("failed to allocate default memory: {e}"),
            )
        })?;
        debug!(pages = DEFAULT_MEMORY_PAGES, "allocated default linear memory");
        Ok(Self { memory })
    }

    /// Type of the default memory: one page, no maximum, not shared
    #[must_use]
    pub fn default_type() -> MemoryType {
        MemoryType::new(DEFAULT_MEMORY_PAGES, None)
    }

    /// Handle of the default memory
    #[must_use]
    pub fn memory(&self) -> Memory {
        self.memory
    }

    /// Type the default memory currently reports
    pub fn memory_type(&self, store: impl AsContext) -> MemoryType {
        self.memory.ty(store)
    }
}
