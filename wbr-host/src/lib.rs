// WBR - wbr-host
// Module: WBR Host Bridge
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)] // Rule 2

//! Module bridge for the WebAssembly Bridge Runtime (WBR).
//!
//! This crate loads a WebAssembly module and links it against the host:
//!
//! - Acquisition: compile while streaming from the source, falling back to
//!   reading the whole artifact first.
//! - Import adaptation: the default memory is bound as `env.memory` when the
//!   caller supplies none, and the built-ins `env.console.log` and
//!   `env.abort` are always present.
//! - Exports: name lookup, untyped and typed calls, and lifting of strings
//!   returned by the module.
//!
//! ## Usage
//!
//! ```rust
//! use wasmtime::Val;
//! use wbr_host::{BytesSource, ModuleBridge};
//!
//! let wat = r#"(module
//!     (func (export "add") (param i32 i32) (result i32)
//!         local.get 0 local.get 1 i32.add))"#;
//!
//! let mut bridge = ModuleBridge::new().unwrap();
//! let module = bridge.acquire(&BytesSource::new("add.wat", wat)).unwrap();
//! let exports = bridge.instantiate_default(&module).unwrap();
//!
//! let results = bridge.call(&exports, "add", &[Val::I32(1), Val::I32(2)]).unwrap();
//! assert_eq!(results[0].i32(), Some(3));
//! ```

#![warn(missing_docs)]
#![warn(clippy::missing_panics_doc)]

pub mod acquire;
pub mod ambient;
pub mod bridge;
pub mod builtins;
pub mod config;
pub mod exports;
pub mod imports;
/// Prelude module for consistent imports
pub mod prelude;
pub mod source;

pub use acquire::{acquire, AcquisitionPath, CompiledModule, FallbackPolicy};
pub use ambient::{AmbientBinding, AmbientScope};
pub use bridge::ModuleBridge;
pub use builtins::BridgeState;
pub use config::{BridgeConfig, OptLevel};
pub use exports::Exports;
pub use imports::{ImportConfig, ABORT_IMPORT, CONSOLE_LOG_IMPORT, ENV_NAMESPACE, MEMORY_IMPORT};
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{BytesSource, FileSource, ModuleLocator, ModuleSource, StreamingFailure};
pub use wbr_error::{Error, ErrorCategory, Result};
