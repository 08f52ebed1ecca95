// WBR - wbr-logging
// Module: Log Operations
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Log operation for the WebAssembly Bridge Runtime.
//!
//! This module provides types for representing log operations in module logging.

use std::borrow::Cow;

use crate::level::LogLevel;

/// Text rendered for an absent message
pub const NULL_TEXT: &str = "null";

/// Log operation from a WebAssembly module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOperation {
    /// Log level
    pub level:   LogLevel,
    /// Log message; `None` when the module passed a null string pointer
    pub message: Option<String>,
    /// Originating module (optional)
    pub origin:  Option<String>,
}

impl LogOperation {
    /// Create a new log operation
    #[must_use]
    pub const fn new(level: LogLevel, message: Option<String>) -> Self {
        Self { level, message, origin: None }
    }

    /// Create a new log operation with an origin
    pub fn with_origin<S1: Into<String>, S2: Into<String>>(
        level: LogLevel,
        message: Option<S1>,
        origin: S2,
    ) -> Self {
        Self { level, message: message.map(Into::into), origin: Some(origin.into()) }
    }

    /// The message as a single line of text, `null` for an absent message
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        match &self.message {
            Some(message) => Cow::Borrowed(message.as_str()),
            None => Cow::Borrowed(NULL_TEXT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_operation_creation() {
        let op = LogOperation::new(LogLevel::Info, Some("test message".to_string()));
        assert_eq!(op.level, LogLevel::Info);
        assert_eq!(op.message.as_deref(), Some("test message"));
        assert!(op.origin.is_none());

        let op = LogOperation::with_origin(LogLevel::Debug, Some("test message"), "module-1");
        assert_eq!(op.level, LogLevel::Debug);
        assert_eq!(op.origin.as_deref(), Some("module-1"));
    }

    #[test]
    fn test_absent_message_renders_null() {
        let op = LogOperation::new(LogLevel::Info, None);
        assert_eq!(op.text(), "null");

        let empty = LogOperation::new(LogLevel::Info, Some(String::new()));
        assert_eq!(empty.text(), "");
        assert_ne!(op, empty);
    }
}
