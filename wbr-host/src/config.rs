// WBR - wbr-host
// Module: Bridge Configuration
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Bridge configuration.
//!
//! Every field is optional in the TOML form:
//!
//! ```toml
//! fuel = 1_000_000
//! max_wasm_stack = 524288
//! opt_level = "speed_and_size"
//! fallback = "any_failure"
//! ambient = ["seed"]
//! console_level = "debug"
//! ```

use serde::{Deserialize, Serialize};

use crate::{acquire::FallbackPolicy, ambient::AmbientBinding, prelude::*, AmbientScope};

/// Compiler optimization level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptLevel {
    /// No optimizations
    None,
    /// Optimize for speed
    #[default]
    Speed,
    /// Optimize for speed and code size
    SpeedAndSize,
}

impl From<OptLevel> for wasmtime::OptLevel {
    fn from(level: OptLevel) -> Self {
        match level {
            OptLevel::None => wasmtime::OptLevel::None,
            OptLevel::Speed => wasmtime::OptLevel::Speed,
            OptLevel::SpeedAndSize => wasmtime::OptLevel::SpeedAndSize,
        }
    }
}

/// Settings of a [`crate::ModuleBridge`] and the engine behind it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Fuel budget per bridge; `None` disables metering
    pub fuel: Option<u64>,
    /// Maximum wasm stack in bytes
    pub max_wasm_stack: Option<usize>,
    /// Compiler optimization level
    pub opt_level: OptLevel,
    /// Acquisition fallback policy
    pub fallback: FallbackPolicy,
    /// Ambient bindings to expose
    pub ambient: Vec<AmbientBinding>,
    /// Level assigned to `console.log` output
    pub console_level: LogLevel,
}

impl BridgeConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| {
            Error::config(codes::CONFIG_PARSE_ERROR, format!("invalid bridge configuration: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::new(
                ErrorCategory::Io,
                codes::IO_ERROR,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "loaded bridge configuration");
        Ok(config)
    }

    /// Check value ranges serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.max_wasm_stack == Some(0) {
            return Err(Error::config(
                codes::CONFIG_INVALID_VALUE,
                "max_wasm_stack must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Set the fuel budget
    #[must_use]
    pub fn with_fuel(mut self, fuel: u64) -> Self {
        self.fuel = Some(fuel);
        self
    }

    /// Set the fallback policy
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Enable an ambient binding
    #[must_use]
    pub fn with_ambient(mut self, binding: AmbientBinding) -> Self {
        if !self.ambient.contains(&binding) {
            self.ambient.push(binding);
        }
        self
    }

    /// The ambient scope this configuration enables
    #[must_use]
    pub fn ambient_scope(&self) -> AmbientScope {
        AmbientScope::new(self.ambient.iter().copied())
    }

    /// The engine settings this configuration asks for
    #[must_use]
    pub fn wasmtime_config(&self) -> wasmtime::Config {
        let mut config = wasmtime::Config::new();
        config.cranelift_opt_level(self.opt_level.into());
        config.consume_fuel(self.fuel.is_some());
        if let Some(stack) = self.max_wasm_stack {
            config.max_wasm_stack(stack);
        }
        config
    }

    /// Build an engine for this configuration
    pub fn engine(&self) -> Result<Engine> {
        Engine::new(&self.wasmtime_config()).map_err(|e| {
            Error::new(
                ErrorCategory::Runtime,
                codes::ENGINE_ERROR,
                format!("failed to create engine: {e:#}"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.fallback, FallbackPolicy::TransportOnly);
        assert_eq!(config.opt_level, OptLevel::Speed);
        assert_eq!(config.console_level, LogLevel::Info);
        assert!(config.ambient_scope().is_empty());
    }

    #[test]
    fn parses_every_field() {
        let config = BridgeConfig::from_toml_str(
            r#"
            fuel = 5000
            max_wasm_stack = 65536
            opt_level = "none"
            fallback = "any_failure"
            ambient = ["seed"]
            console_level = "WARN"
            "#,
        )
        .unwrap();
        assert_eq!(config.fuel, Some(5000));
        assert_eq!(config.max_wasm_stack, Some(65536));
        assert_eq!(config.opt_level, OptLevel::None);
        assert_eq!(config.fallback, FallbackPolicy::AnyFailure);
        assert!(config.ambient_scope().contains(AmbientBinding::Seed));
        assert_eq!(config.console_level, LogLevel::Warn);
    }

    #[test]
    fn rejects_unknown_keys_and_values() {
        let err = BridgeConfig::from_toml_str("fule = 1").unwrap_err();
        assert_eq!(err.code, codes::CONFIG_PARSE_ERROR);

        let err = BridgeConfig::from_toml_str("ambient = [\"clock\"]").unwrap_err();
        assert!(err.is_config_error());

        let err = BridgeConfig::from_toml_str("max_wasm_stack = 0").unwrap_err();
        assert_eq!(err.code, codes::CONFIG_INVALID_VALUE);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fuel = 42").unwrap();
        let config = BridgeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.fuel, Some(42));

        let err = BridgeConfig::from_file(file.path().with_extension("missing")).unwrap_err();
        assert_eq!(err.category, ErrorCategory::Io);
    }

    #[test]
    fn builds_fuel_engine() {
        let config = BridgeConfig::default().with_fuel(10);
        let engine = config.engine().unwrap();
        let mut store = Store::new(&engine, ());
        store.set_fuel(10).unwrap();
        assert_eq!(store.get_fuel().unwrap(), 10);
    }
}
