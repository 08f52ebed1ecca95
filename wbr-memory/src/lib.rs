// WBR - wbr-memory
// Module: WBR Memory
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)] // Rule 2

//! Linear memory support for the WebAssembly Bridge Runtime (WBR).
//!
//! This crate owns the two pieces of the bridge that deal with raw linear
//! memory:
//!
//! - [`MemoryArbiter`]: allocates the default memory a module is linked
//!   against when the caller supplies none.
//! - [`lift_string`]: decodes a length-prefixed UTF-16 string out of a
//!   memory snapshot.
//!
//! ## Usage
//!
//! ```rust
//! use wbr_memory::lift_string;
//!
//! // byte length 4 at offset 4, "hi" as UTF-16LE at offset 8
//! let mut memory = vec![0u8; 16];
//! memory[4..8].copy_from_slice(&4u32.to_le_bytes());
//! memory[8..12].copy_from_slice(&[b'h', 0, b'i', 0]);
//!
//! assert_eq!(lift_string(Some(&memory), 8).unwrap().as_deref(), Some("hi"));
//! assert_eq!(lift_string(Some(&memory), 0).unwrap(), None);
//! ```

#![warn(missing_docs)]

pub mod arbiter;
pub mod lift;

pub use arbiter::{MemoryArbiter, DEFAULT_MEMORY_PAGES, WASM_PAGE_SIZE};
pub use lift::{
    lift_string, lift_string_chunked, lift_utf16, read_length_prefix, LENGTH_PREFIX_BYTES,
    LIFT_CHUNK_UNITS,
};
