// WBR - wbr-host
// Module: Prelude
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Prelude module for wbr-host
//!
//! Re-exports the types used across the modules of this crate so each module
//! pulls them in with a single `use crate::prelude::*;`.

pub use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    string::{String, ToString},
    vec::Vec,
};

pub use tracing::{debug, info, trace, warn};
pub use wasmtime::{
    AsContext, AsContextMut, Caller, Engine, Extern, Func, Instance, Linker, Memory, Module,
    Store, Trap, TypedFunc, Val, ValType, WasmParams, WasmResults,
};
pub use wbr_error::{codes, Error, ErrorCategory, Result};
pub use wbr_logging::{LogHandlers, LogLevel, LogOperation};
pub use wbr_memory::{lift_string, MemoryArbiter};
