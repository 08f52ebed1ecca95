// WBR - wbr-host
// Module: Ambient Bindings
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Ambient scope.
//!
//! Bindings a module may import from `env` without the caller supplying
//! them. The scope is a fixed whitelist and starts out empty; each binding
//! has to be enabled by name.

use std::{
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::{imports::ENV_NAMESPACE, prelude::*};

/// A binding the ambient scope can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientBinding {
    /// `seed() -> f64`: milliseconds since the Unix epoch
    Seed,
}

impl AmbientBinding {
    /// Every binding the scope knows about
    pub const ALL: &'static [AmbientBinding] = &[AmbientBinding::Seed];

    /// Import name under `env`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Seed => "seed",
        }
    }

    fn define<T: 'static>(self, linker: &mut Linker<T>) -> Result<()> {
        let defined = match self {
            Self::Seed => linker.func_wrap(ENV_NAMESPACE, self.name(), seed),
        };
        defined.map(|_| ()).map_err(|e| {
            Error::new(
                ErrorCategory::Linkage,
                codes::IMPORT_DEFINITION_ERROR,
                format!("failed to define ambient binding `{}`: {e}", self.name()),
            )
        })
    }
}

impl FromStr for AmbientBinding {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL.iter().copied().find(|binding| binding.name() == name).ok_or_else(|| {
            Error::new(
                ErrorCategory::Linkage,
                codes::UNKNOWN_AMBIENT_BINDING,
                format!("unknown ambient binding `{name}`"),
            )
        })
    }
}

impl fmt::Display for AmbientBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn seed() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// The set of enabled ambient bindings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientScope {
    enabled: Vec<AmbientBinding>,
}

impl AmbientScope {
    /// An empty scope: nothing resolves ambiently
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A scope with the given bindings enabled
    pub fn new(bindings: impl IntoIterator<Item = AmbientBinding>) -> Self {
        let mut scope = Self::empty();
        for binding in bindings {
            scope.enable(binding);
        }
        scope
    }

    /// Enable a binding; enabling twice has no effect
    pub fn enable(&mut self, binding: AmbientBinding) {
        if !self.enabled.contains(&binding) {
            self.enabled.push(binding);
        }
    }

    /// Whether `binding` is enabled
    #[must_use]
    pub fn contains(&self, binding: AmbientBinding) -> bool {
        self.enabled.contains(&binding)
    }

    /// Whether no binding is enabled
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Define every enabled binding in `linker`
    pub fn define<T: 'static>(&self, linker: &mut Linker<T>) -> Result<()> {
        for binding in &self.enabled {
            binding.define(linker)?;
            trace!(binding = binding.name(), "defined ambient binding");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names_only() {
        assert_eq!("seed".parse::<AmbientBinding>().unwrap(), AmbientBinding::Seed);

        let err = "Math.random".parse::<AmbientBinding>().unwrap_err();
        assert!(err.is_linkage_error());
        assert_eq!(err.code, codes::UNKNOWN_AMBIENT_BINDING);
    }

    #[test]
    fn scope_starts_empty_and_deduplicates() {
        let mut scope = AmbientScope::empty();
        assert!(scope.is_empty());
        assert!(!scope.contains(AmbientBinding::Seed));

        scope.enable(AmbientBinding::Seed);
        scope.enable(AmbientBinding::Seed);
        assert_eq!(scope, AmbientScope::new([AmbientBinding::Seed]));
    }

    #[test]
    fn seed_is_after_2020() {
        assert!(seed() > 1_577_836_800_000.0);
    }
}
