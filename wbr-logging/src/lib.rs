// WBR - wbr-logging
// Module: Logging Infrastructure
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! # WBR Logging
//!
//! Logging infrastructure for the WebAssembly Bridge Runtime (WBR).
//!
//! Modules write diagnostic text through the `console.log` import; the bridge
//! lifts the string and hands it to the handlers registered here as a
//! [`LogOperation`].

#![forbid(unsafe_code)] // Rule 2
#![warn(missing_docs)]

// Reexports for convenience
pub use wbr_error::{Error, Result};

/// Logging handlers for processing log messages.
///
/// This module contains the handler registry that receives console output
/// from WebAssembly modules.
pub mod handler;

/// Log level definitions for categorizing message severity.
pub mod level;

/// Log operation data structures and utilities.
pub mod operation;

// Reexport types
pub use handler::{stderr_handler, tracing_handler, LogHandler, LogHandlers};
pub use level::{LogLevel, ParseLogLevelError};
pub use operation::LogOperation;
