// WBR - wbr-host
// Module: Module Sources
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Module sources.
//!
//! A [`ModuleSource`] offers the two ways a compiled module can be obtained:
//! the streaming path (`compile_streaming`), or reading the whole artifact
//! into memory first and compiling either binary or text (`read_all`).
//! [`crate::acquire`] decides which one is used.
//!
//! wasmtime compiles from a complete byte slice, so no source compiles
//! while bytes are still arriving. The streaming path differs from the
//! buffered one in what it accepts: it only takes artifacts that identify
//! as binary modules (magic bytes on disk, `application/wasm` over HTTP) and
//! hands them to the compiler without the text-format fallback.

use std::{fs::File, io::Read, str::FromStr};

use crate::prelude::*;

/// The four magic bytes every binary module starts with
pub const WASM_MAGIC: [u8; 4] = *b"\0asm";

/// Media type a server must report for a module to be compiled while fetched
pub const WASM_CONTENT_TYPE: &str = "application/wasm";

/// Why the streaming path did not produce a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamingFailure {
    /// The transport cannot stream this artifact (unsupported transport,
    /// network error, wrong content type). The buffered path may still work.
    Unavailable(String),
    /// The artifact was delivered and the compiler rejected it
    Compile(String),
}

impl StreamingFailure {
    /// Whether this is a transport-level failure
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// The failure reason
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Unavailable(reason) | Self::Compile(reason) => reason,
        }
    }
}

impl fmt::Display for StreamingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "streaming unavailable: {reason}"),
            Self::Compile(reason) => write!(f, "compile failed: {reason}"),
        }
    }
}

/// Somewhere a module artifact can be obtained from
pub trait ModuleSource {
    /// Human-readable location of the artifact
    fn locator(&self) -> String;

    /// Compile the artifact as a binary module, provided the source reports
    /// it as one. Sources that cannot tell report
    /// [`StreamingFailure::Unavailable`].
    fn compile_streaming(&self, engine: &Engine) -> core::result::Result<Module, StreamingFailure>;

    /// Read the complete artifact into memory
    fn read_all(&self) -> Result<Vec<u8>>;
}

fn read_error(locator: &str, reason: impl fmt::Display) -> Error {
    Error::new(
        ErrorCategory::Acquisition,
        codes::ARTIFACT_READ_ERROR,
        format!("failed to read {locator}: {reason}"),
    )
}

/// A module stored in a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the artifact
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn has_binary_magic(&self) -> std::io::Result<bool> {
        let mut magic = [0u8; 4];
        let mut file = File::open(&self.path)?;
        match file.read_exact(&mut magic) {
            Ok(()) => Ok(magic == WASM_MAGIC),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl ModuleSource for FileSource {
    fn locator(&self) -> String {
        self.path.display().to_string()
    }

    fn compile_streaming(&self, engine: &Engine) -> core::result::Result<Module, StreamingFailure> {
        match self.has_binary_magic() {
            Ok(true) => {}
            Ok(false) => {
                return Err(StreamingFailure::Unavailable(format!(
                    "{} is not a binary module",
                    self.locator()
                )))
            }
            Err(e) => return Err(StreamingFailure::Unavailable(e.to_string())),
        }
        Module::from_file(engine, &self.path).map_err(|e| StreamingFailure::Compile(format!("{e:#}")))
    }

    fn read_all(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| read_error(&self.locator(), e))
    }
}

/// A module already held in memory.
///
/// There is nothing to stream from, so only the buffered path applies.
#[derive(Clone, PartialEq, Eq)]
pub struct BytesSource {
    name: String,
    bytes: Vec<u8>,
}

impl BytesSource {
    /// Create a source named `name` holding `bytes` (binary or text format)
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), bytes: bytes.into() }
    }
}

impl fmt::Debug for BytesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BytesSource").field("name", &self.name).field("len", &self.bytes.len()).finish()
    }
}

impl ModuleSource for BytesSource {
    fn locator(&self) -> String {
        self.name.clone()
    }

    fn compile_streaming(&self, _engine: &Engine) -> core::result::Result<Module, StreamingFailure> {
        Err(StreamingFailure::Unavailable("in-memory artifacts are not streamed".to_string()))
    }

    fn read_all(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// A module served over HTTP(S).
///
/// The streaming path is a content-type gate: a response labelled
/// `application/wasm` has its body read in full and compiled as a binary
/// module. Any other media type leaves the artifact to the buffered path.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpSource {
    /// Create a source for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), client: reqwest::blocking::Client::new() }
    }

    fn get(&self) -> reqwest::Result<reqwest::blocking::Response> {
        self.client.get(&self.url).send()?.error_for_status()
    }
}

#[cfg(feature = "http")]
impl ModuleSource for HttpSource {
    fn locator(&self) -> String {
        self.url.clone()
    }

    fn compile_streaming(&self, engine: &Engine) -> core::result::Result<Module, StreamingFailure> {
        let response = self.get().map_err(|e| StreamingFailure::Unavailable(e.to_string()))?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        if !media_type.eq_ignore_ascii_case(WASM_CONTENT_TYPE) {
            return Err(StreamingFailure::Unavailable(format!(
                "unexpected content type `{content_type}`, expected `{WASM_CONTENT_TYPE}`"
            )));
        }
        let body = response.bytes().map_err(|e| StreamingFailure::Unavailable(e.to_string()))?;
        Module::from_binary(engine, &body).map_err(|e| StreamingFailure::Compile(format!("{e:#}")))
    }

    fn read_all(&self) -> Result<Vec<u8>> {
        let body = self.get().and_then(|response| response.bytes());
        body.map(|bytes| bytes.to_vec()).map_err(|e| read_error(&self.url, e))
    }
}

/// Where a module is located
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleLocator {
    /// Filesystem path
    File(PathBuf),
    /// `http://` or `https://` URL
    Url(String),
}

impl ModuleLocator {
    /// Classify `locator`: URLs by scheme, anything else is a path
    pub fn parse(locator: &str) -> Result<Self> {
        let trimmed = locator.trim();
        if trimmed.is_empty() {
            return Err(Error::new(
                ErrorCategory::Acquisition,
                codes::UNSUPPORTED_LOCATOR,
                "empty module locator",
            ));
        }
        let lowered = trimmed.to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            Ok(Self::Url(trimmed.to_string()))
        } else {
            Ok(Self::File(PathBuf::from(trimmed)))
        }
    }

    /// Open the source this locator points at
    pub fn open(&self) -> Result<Box<dyn ModuleSource>> {
        match self {
            Self::File(path) => Ok(Box::new(FileSource::new(path.clone()))),
            #[cfg(feature = "http")]
            Self::Url(url) => Ok(Box::new(HttpSource::new(url.clone()))),
            #[cfg(not(feature = "http"))]
            Self::Url(url) => Err(Error::new(
                ErrorCategory::Acquisition,
                codes::UNSUPPORTED_LOCATOR,
                format!("cannot fetch {url}: built without the `http` feature"),
            )),
        }
    }
}

impl FromStr for ModuleLocator {
    type Err = Error;

    fn from_str(locator: &str) -> Result<Self> {
        Self::parse(locator)
    }
}

impl fmt::Display for ModuleLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn locator_classifies_by_scheme() {
        assert_eq!(
            ModuleLocator::parse("./build/release.wasm").unwrap(),
            ModuleLocator::File(PathBuf::from("./build/release.wasm"))
        );
        assert_eq!(
            ModuleLocator::parse("HTTPS://example.org/m.wasm").unwrap(),
            ModuleLocator::Url("HTTPS://example.org/m.wasm".to_string())
        );
        assert_eq!(ModuleLocator::parse("  ").unwrap_err().code, codes::UNSUPPORTED_LOCATOR);
    }

    #[cfg(not(feature = "http"))]
    #[test]
    fn url_needs_http_feature() {
        let locator = ModuleLocator::parse("http://localhost/m.wasm").unwrap();
        let err = locator.open().err().unwrap();
        assert!(err.is_acquisition_error());
        assert_eq!(err.code, codes::UNSUPPORTED_LOCATOR);
    }

    #[test]
    fn bytes_source_never_streams() {
        let engine = Engine::default();
        let source = BytesSource::new("inline", b"(module)".to_vec());
        assert!(source.compile_streaming(&engine).unwrap_err().is_unavailable());
        assert_eq!(source.read_all().unwrap(), b"(module)");
    }

    #[test]
    fn short_file_is_not_binary() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\0a").unwrap();
        let source = FileSource::new(file.path());
        let engine = Engine::default();
        assert!(source.compile_streaming(&engine).unwrap_err().is_unavailable());
    }

    #[test]
    fn missing_file_reads_as_acquisition_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.wasm"));
        let engine = Engine::default();
        assert!(source.compile_streaming(&engine).unwrap_err().is_unavailable());
        let err = source.read_all().unwrap_err();
        assert_eq!(err.code, codes::ARTIFACT_READ_ERROR);
    }
}
