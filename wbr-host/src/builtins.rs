// WBR - wbr-host
// Module: Built-in Host Functions
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Built-in host functions: `env.console.log` and `env.abort`.
//!
//! Both take string pointers into the memory of the calling instance. The
//! memory is looked up on every call, never captured at link time: the
//! instance's exported `memory` first, then the memory bound to `env.memory`
//! when the module imports one.

use std::sync::Arc;

use wbr_logging::operation::NULL_TEXT;

use crate::{
    imports::{ABORT_IMPORT, CONSOLE_LOG_IMPORT, ENV_NAMESPACE, MEMORY_IMPORT},
    prelude::*,
};

/// Host-side state carried by the store of a bridge
#[derive(Debug, Clone)]
pub struct BridgeState {
    console: LogHandlers,
    console_level: LogLevel,
}

impl BridgeState {
    /// Create a state dispatching console output to `console` at `console_level`
    #[must_use]
    pub fn new(console: LogHandlers, console_level: LogLevel) -> Self {
        Self { console, console_level }
    }

    /// Console handlers
    #[must_use]
    pub fn console(&self) -> &LogHandlers {
        &self.console
    }

    /// Mutable access to the console handlers
    pub fn console_mut(&mut self) -> &mut LogHandlers {
        &mut self.console
    }

    fn log(&self, origin: &str, message: Option<String>) {
        self.console.handle(&LogOperation::with_origin(self.console_level, message, origin));
    }
}

fn caller_memory(caller: &mut Caller<'_, BridgeState>, imported: Option<Memory>) -> Option<Memory> {
    caller.get_export(MEMORY_IMPORT).and_then(Extern::into_memory).or(imported)
}

fn lift_from_caller(
    caller: &mut Caller<'_, BridgeState>,
    imported: Option<Memory>,
    pointer: u32,
) -> Result<Option<String>> {
    let memory = caller_memory(caller, imported);
    lift_string(memory.map(|memory| memory.data(&*caller)), pointer)
}

/// Render the trap message `abort` raises
#[must_use]
pub fn abort_message(
    message: Option<&str>,
    file_name: Option<&str>,
    line: u32,
    column: u32,
) -> String {
    format!(
        "{} in {}:{}:{}",
        message.unwrap_or(NULL_TEXT),
        file_name.unwrap_or(NULL_TEXT),
        line,
        column
    )
}

fn definition_error(name: &str, e: &wasmtime::Error) -> Error {
    Error::new(
        ErrorCategory::Linkage,
        codes::IMPORT_DEFINITION_ERROR,
        format!("failed to define built-in `{ENV_NAMESPACE}.{name}`: {e}"),
    )
}

/// Define the built-ins in `linker`, shadowing any earlier binding.
///
/// `imported_memory` is the memory the module is linked against as
/// `env.memory`, or `None` when the module does not import one. `origin` tags
/// console output and aborts with the locator of the module being linked, so
/// every instance keeps its own tag within a shared store.
///
/// When an `abort` argument cannot be lifted, the decoding error is raised
/// instead of the abort trap.
pub fn define(
    linker: &mut Linker<BridgeState>,
    imported_memory: Option<Memory>,
    origin: &str,
) -> Result<()> {
    let origin: Arc<str> = Arc::from(origin);

    let console_origin = origin.clone();
    linker
        .func_wrap(
            ENV_NAMESPACE,
            CONSOLE_LOG_IMPORT,
            move |mut caller: Caller<'_, BridgeState>, pointer: u32| -> wasmtime::Result<()> {
                let message = lift_from_caller(&mut caller, imported_memory, pointer)?;
                caller.data().log(&console_origin, message);
                Ok(())
            },
        )
        .map_err(|e| definition_error(CONSOLE_LOG_IMPORT, &e))?;

    linker
        .func_wrap(
            ENV_NAMESPACE,
            ABORT_IMPORT,
            move |mut caller: Caller<'_, BridgeState>,
                  message: u32,
                  file_name: u32,
                  line: u32,
                  column: u32|
                  -> wasmtime::Result<()> {
                let message = lift_from_caller(&mut caller, imported_memory, message)?;
                let file_name = lift_from_caller(&mut caller, imported_memory, file_name)?;
                let text = abort_message(message.as_deref(), file_name.as_deref(), line, column);
                debug!(origin = %origin, %text, "module aborted");
                Err(Error::module_trap(text).into())
            },
        )
        .map_err(|e| definition_error(ABORT_IMPORT, &e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_message_format() {
        assert_eq!(abort_message(Some("boom"), Some("file.wasm"), 3, 7), "boom in file.wasm:3:7");
        assert_eq!(abort_message(None, None, 0, 0), "null in null:0:0");
        assert_eq!(abort_message(Some(""), Some("a.ts"), u32::MAX, 1), " in a.ts:4294967295:1");
    }
}
