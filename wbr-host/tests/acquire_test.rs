// WBR - wbr-host
// Module: Acquisition Tests
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Acquisition through real sources: files and, with the `http` feature, a
//! local HTTP server.

use std::io::Write;

use wbr_error::codes;
use wbr_host::{AcquisitionPath, BridgeConfig, FallbackPolicy, FileSource, ModuleBridge};

const ADD: &str = r#"
(module
  (func (export "add") (param i32 i32) (result i32)
    local.get 0
    local.get 1
    i32.add))
"#;

fn write_temp(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn binary_file_is_streamed() {
    let file = write_temp(".wasm", &wat::parse_str(ADD).unwrap());
    let bridge = ModuleBridge::new().unwrap();

    let module = bridge.acquire(&FileSource::new(file.path())).unwrap();
    assert_eq!(module.path(), AcquisitionPath::Streaming);
    assert_eq!(module.locator(), file.path().display().to_string());
    assert!(module.module().get_export("add").is_some());
}

#[test]
fn text_file_is_buffered() {
    let file = write_temp(".wat", ADD.as_bytes());
    let mut bridge = ModuleBridge::new().unwrap();

    let module = bridge.acquire_locator(&file.path().display().to_string()).unwrap();
    assert_eq!(module.path(), AcquisitionPath::Buffered);

    let exports = bridge.instantiate_default(&module).unwrap();
    let add = bridge.typed::<(i32, i32), i32>(&exports, "add").unwrap();
    assert_eq!(bridge.call_typed(&add, (1, 2)).unwrap(), 3);
}

#[test]
fn corrupt_binary_follows_fallback_policy() {
    let file = write_temp(".wasm", b"\0asm\x01\0\0\0\xff\xff");

    let bridge = ModuleBridge::new().unwrap();
    let err = bridge.acquire(&FileSource::new(file.path())).unwrap_err();
    assert!(err.is_acquisition_error(), "{err}");
    assert_eq!(err.code, codes::COMPILE_FAILED);

    let config = BridgeConfig::default().with_fallback(FallbackPolicy::AnyFailure);
    let bridge = ModuleBridge::with_config(config).unwrap();
    let err = bridge.acquire(&FileSource::new(file.path())).unwrap_err();
    assert_eq!(err.code, codes::ACQUISITION_FAILED);
    assert!(err.message().contains("streaming"), "{err}");
    assert!(err.message().contains("buffered"), "{err}");
}

#[test]
fn missing_file_fails_both_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("release.wasm");

    let bridge = ModuleBridge::new().unwrap();
    let err = bridge.acquire_locator(&path.display().to_string()).unwrap_err();
    assert!(err.is_acquisition_error(), "{err}");
    assert_eq!(err.code, codes::ACQUISITION_FAILED);
}

#[cfg(feature = "http")]
mod http {
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread,
    };

    use super::*;

    /// Serve `body` to `connections` requests, then stop
    fn serve(body: Vec<u8>, content_type: &'static str, connections: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming().take(connections) {
                let mut stream = stream.unwrap();
                let mut request = [0u8; 4096];
                let _ = stream.read(&mut request);
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                stream.write_all(head.as_bytes()).unwrap();
                stream.write_all(&body).unwrap();
            }
        });
        format!("http://{address}/release.wasm")
    }

    #[test]
    fn wasm_content_type_is_streamed() {
        let url = serve(wat::parse_str(ADD).unwrap(), "application/wasm", 1);
        let bridge = ModuleBridge::new().unwrap();
        let module = bridge.acquire_locator(&url).unwrap();
        assert_eq!(module.path(), AcquisitionPath::Streaming);
        assert_eq!(module.locator(), url);
    }

    #[test]
    fn other_content_type_is_buffered() {
        let url = serve(wat::parse_str(ADD).unwrap(), "application/octet-stream", 2);
        let bridge = ModuleBridge::new().unwrap();
        let module = bridge.acquire_locator(&url).unwrap();
        assert_eq!(module.path(), AcquisitionPath::Buffered);
    }
}
