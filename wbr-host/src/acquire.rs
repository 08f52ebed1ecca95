// WBR - wbr-host
// Module: Module Acquisition
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Module acquisition: streaming compile first, buffered compile second.

use serde::{Deserialize, Serialize};

use crate::{
    prelude::*,
    source::{ModuleSource, StreamingFailure},
};

/// Which path produced a compiled module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcquisitionPath {
    /// Compiled by the source's streaming path (binary artifacts only)
    Streaming,
    /// Compiled from a fully read byte buffer
    Buffered,
}

impl fmt::Display for AcquisitionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Streaming => "streaming",
            Self::Buffered => "buffered",
        })
    }
}

/// When a failed streaming compile falls back to the buffered path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Only after transport-level failures; a rejected module is final
    #[default]
    TransportOnly,
    /// After any streaming failure, including compile errors
    AnyFailure,
}

impl FallbackPolicy {
    fn allows(self, failure: &StreamingFailure) -> bool {
        match self {
            Self::TransportOnly => failure.is_unavailable(),
            Self::AnyFailure => true,
        }
    }
}

/// A compiled module and how it was obtained
#[derive(Debug, Clone)]
pub struct CompiledModule {
    module: Module,
    path: AcquisitionPath,
    locator: String,
}

impl CompiledModule {
    /// The compiled module
    #[must_use]
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Path that succeeded
    #[must_use]
    pub fn path(&self) -> AcquisitionPath {
        self.path
    }

    /// Where the artifact came from
    #[must_use]
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Whether the module imports `namespace.name`
    #[must_use]
    pub fn imports(&self, namespace: &str, name: &str) -> bool {
        self.module.imports().any(|import| import.module() == namespace && import.name() == name)
    }
}

/// Compile the module behind `source`.
///
/// The streaming path is tried once. If it fails and `policy` allows it, the
/// buffered path is tried once. When both fail the error carries both
/// reasons.
pub fn acquire(
    engine: &Engine,
    source: &dyn ModuleSource,
    policy: FallbackPolicy,
) -> Result<CompiledModule> {
    let locator = source.locator();

    let streaming_failure = match source.compile_streaming(engine) {
        Ok(module) => {
            info!(locator = %locator, path = %AcquisitionPath::Streaming, "acquired module");
            return Ok(CompiledModule { module, path: AcquisitionPath::Streaming, locator });
        }
        Err(failure) if !policy.allows(&failure) => {
            return Err(Error::new(
                ErrorCategory::Acquisition,
                codes::COMPILE_FAILED,
                format!("failed to compile {locator}: {}", failure.reason()),
            ));
        }
        Err(failure) => failure,
    };
    debug!(locator = %locator, reason = %streaming_failure, "falling back to buffered compile");

    let buffered = source.read_all().and_then(|bytes| {
        Module::new(engine, &bytes).map_err(|e| {
            Error::new(ErrorCategory::Acquisition, codes::COMPILE_FAILED, format!("{e:#}"))
        })
    });
    match buffered {
        Ok(module) => {
            info!(locator = %locator, path = %AcquisitionPath::Buffered, "acquired module");
            Ok(CompiledModule { module, path: AcquisitionPath::Buffered, locator })
        }
        Err(e) => {
            warn!(locator = %locator, "both acquisition paths failed");
            Err(Error::acquisition(format!(
                "failed to acquire {locator}: streaming: {streaming_failure}; buffered: {}",
                e.message()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Counts how often each path is taken
    struct Scripted {
        streaming: StreamingFailure,
        bytes: Option<Vec<u8>>,
        streamed: Cell<u32>,
        read: Cell<u32>,
    }

    impl Scripted {
        fn new(streaming: StreamingFailure, bytes: Option<&[u8]>) -> Self {
            Self {
                streaming,
                bytes: bytes.map(<[u8]>::to_vec),
                streamed: Cell::new(0),
                read: Cell::new(0),
            }
        }
    }

    impl ModuleSource for Scripted {
        fn locator(&self) -> String {
            "scripted".to_string()
        }

        fn compile_streaming(
            &self,
            _engine: &Engine,
        ) -> core::result::Result<Module, StreamingFailure> {
            self.streamed.set(self.streamed.get() + 1);
            Err(self.streaming.clone())
        }

        fn read_all(&self) -> Result<Vec<u8>> {
            self.read.set(self.read.get() + 1);
            self.bytes.clone().ok_or_else(|| Error::acquisition("connection reset"))
        }
    }

    #[test]
    fn transport_failure_falls_back_once() {
        let engine = Engine::default();
        let source = Scripted::new(StreamingFailure::Unavailable("offline".into()), Some(&b"(module)"[..]));

        let compiled = acquire(&engine, &source, FallbackPolicy::TransportOnly).unwrap();
        assert_eq!(compiled.path(), AcquisitionPath::Buffered);
        assert_eq!(compiled.locator(), "scripted");
        assert_eq!((source.streamed.get(), source.read.get()), (1, 1));
    }

    #[test]
    fn compile_failure_is_final_by_default() {
        let engine = Engine::default();
        let source = Scripted::new(StreamingFailure::Compile("bad magic".into()), Some(&b"(module)"[..]));

        let err = acquire(&engine, &source, FallbackPolicy::TransportOnly).unwrap_err();
        assert!(err.is_acquisition_error());
        assert_eq!(err.code, codes::COMPILE_FAILED);
        assert_eq!(source.read.get(), 0);

        let compiled = acquire(&engine, &source, FallbackPolicy::AnyFailure).unwrap();
        assert_eq!(compiled.path(), AcquisitionPath::Buffered);
    }

    #[test]
    fn both_failures_are_reported() {
        let engine = Engine::default();
        let source = Scripted::new(StreamingFailure::Unavailable("offline".into()), None);

        let err = acquire(&engine, &source, FallbackPolicy::TransportOnly).unwrap_err();
        assert_eq!(err.code, codes::ACQUISITION_FAILED);
        assert!(err.message().contains("offline"), "{err}");
        assert!(err.message().contains("connection reset"), "{err}");
        assert_eq!((source.streamed.get(), source.read.get()), (1, 1));
    }
}
