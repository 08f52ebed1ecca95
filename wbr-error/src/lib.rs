// WBR - wbr-error
// Module: WBR Error Handling
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! WBR Error handling library
//!
//! This library provides the error type shared by every crate of the
//! WebAssembly Bridge Runtime.
//!
//! # Error Categories
//!
//! Errors are organized into categories, each with its own range of error
//! codes:
//!
//! ## Acquisition Errors (1000-1999)
//! - Both compile paths failed
//! - Module rejected by the compiler
//!
//! ## Linkage Errors (2000-2999)
//! - Unresolved or mismatched imports
//!
//! ## Trap Errors (3000-3999)
//! - `abort` called by the module
//! - Engine traps, fuel exhaustion
//!
//! ## Decoding Errors (4000-4999)
//! - Malformed string pointers
//!
//! # Usage
//!
//! ```
//! use wbr_error::{codes, Error, ErrorCategory};
//!
//! let error = Error::new(
//!     ErrorCategory::Decoding,
//!     codes::PAYLOAD_OUT_OF_BOUNDS,
//!     "string payload exceeds memory",
//! );
//! assert!(error.is_decoding_error());
//!
//! let trap = Error::module_trap("boom in file.wasm:3:7");
//! assert_eq!(trap.message(), "boom in file.wasm:3:7");
//! ```

#![forbid(unsafe_code)] // Rule 2
#![warn(clippy::pedantic)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// Error codes for wbr
pub mod codes;
/// Error and error handling types
pub mod errors;

// Re-export key types
pub use errors::{Error, ErrorCategory};

/// A specialized `Result` type for WBR operations.
pub type Result<T> = core::result::Result<T, Error>;
