// WBR - wbr-logging
// Module: Log Handlers
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Log handler for the WebAssembly Bridge Runtime.
//!
//! This module provides the registry that console output from WebAssembly
//! modules is dispatched to.

use std::{
    fmt,
    io::{self, Write},
    sync::Arc,
};

use crate::{level::LogLevel, operation::LogOperation};

/// Function type for handling log operations
pub type LogHandler = Arc<dyn Fn(&LogOperation) + Send + Sync>;

/// Ordered set of log handlers.
///
/// Every registered handler sees every operation, in registration order.
/// Cloning the registry shares the handlers.
#[derive(Clone, Default)]
pub struct LogHandlers {
    handlers: Vec<LogHandler>,
}

impl fmt::Debug for LogHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogHandlers").field("registered", &self.handlers.len()).finish()
    }
}

impl LogHandlers {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Create a registry holding the stderr line writer
    #[must_use]
    pub fn with_stderr() -> Self {
        Self { handlers: vec![stderr_handler()] }
    }

    /// Register a log handler
    pub fn register<F>(&mut self, handler: F)
    where
        F: Fn(&LogOperation) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
    }

    /// Drop every handler and register `handler` as the only one
    pub fn replace<F>(&mut self, handler: F)
    where
        F: Fn(&LogOperation) + Send + Sync + 'static,
    {
        self.handlers.clear();
        self.register(handler);
    }

    /// Handle a log operation
    pub fn handle(&self, operation: &LogOperation) {
        for handler in &self.handlers {
            handler(operation);
        }
    }

    /// Check if any log handler is registered
    #[must_use]
    pub fn has_handlers(&self) -> bool {
        !self.handlers.is_empty()
    }

    /// Number of registered handlers
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Write one operation as a single line.
///
/// Embedded line breaks are kept, the terminating newline is always added.
pub fn write_line<W: Write>(writer: &mut W, operation: &LogOperation) -> io::Result<()> {
    writeln!(writer, "{}", operation.text())
}

/// Handler that writes each operation as one line to stderr
#[must_use]
pub fn stderr_handler() -> LogHandler {
    Arc::new(|operation: &LogOperation| {
        let stderr = io::stderr();
        let mut lock = stderr.lock();
        // A closed stderr leaves nowhere to report to.
        let _ = write_line(&mut lock, operation);
    })
}

/// Handler that forwards each operation as a `tracing` event
#[must_use]
pub fn tracing_handler() -> LogHandler {
    Arc::new(|operation: &LogOperation| {
        let origin = operation.origin.as_deref().unwrap_or("module");
        let text = operation.text();
        match operation.level {
            LogLevel::Trace => tracing::trace!(target: "wbr::console", origin, "{text}"),
            LogLevel::Debug => tracing::debug!(target: "wbr::console", origin, "{text}"),
            LogLevel::Info => tracing::info!(target: "wbr::console", origin, "{text}"),
            LogLevel::Warn => tracing::warn!(target: "wbr::console", origin, "{text}"),
            LogLevel::Error | LogLevel::Critical => {
                tracing::error!(target: "wbr::console", origin, "{text}");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_handlers_receive_operations_in_order() {
        let mut registry = LogHandlers::new();

        // Test without handler
        assert!(!registry.has_handlers());

        // Logging without handler should not panic
        registry.handle(&LogOperation::new(LogLevel::Info, Some("dropped".to_string())));

        let received = Arc::new(Mutex::new(Vec::new()));
        {
            let received = received.clone();
            registry.register(move |op| {
                received.lock().unwrap().push(("first", op.text().into_owned()));
            });
        }
        {
            let received = received.clone();
            registry.register(move |op| {
                received.lock().unwrap().push(("second", op.text().into_owned()));
            });
        }
        assert_eq!(registry.len(), 2);

        registry.handle(&LogOperation::new(LogLevel::Info, Some("hello".to_string())));
        registry.handle(&LogOperation::new(LogLevel::Info, None));

        let received = received.lock().unwrap();
        assert_eq!(
            *received,
            vec![
                ("first", "hello".to_string()),
                ("second", "hello".to_string()),
                ("first", "null".to_string()),
                ("second", "null".to_string()),
            ]
        );
    }

    #[test]
    fn test_replace_drops_previous_handlers() {
        let mut registry = LogHandlers::with_stderr();
        let hits = Arc::new(Mutex::new(0));
        {
            let hits = hits.clone();
            registry.replace(move |_| *hits.lock().unwrap() += 1);
        }
        assert_eq!(registry.len(), 1);
        registry.handle(&LogOperation::new(LogLevel::Warn, None));
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn test_write_line_renders_single_line() {
        let mut out = Vec::new();
        write_line(&mut out, &LogOperation::new(LogLevel::Info, Some("3".to_string()))).unwrap();
        write_line(&mut out, &LogOperation::new(LogLevel::Info, None)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3\nnull\n");
    }
}
