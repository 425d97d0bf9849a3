//! Circuit profile resolution for the CLI.
//!
//! Layers, lowest precedence first: built-in defaults, environment
//! (`WITNESS_BOUND`, `WITNESS_HASH`), a JSON profile file, command-line flags.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;
use witness_core::{CircuitProfile, HashKind, ValueBound};

/// A partial profile; unset fields fall through to the layer below.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileOverrides {
    pub bound: Option<ValueBound>,
    pub hash: Option<HashKind>,
}

impl ProfileOverrides {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bound = lookup("WITNESS_BOUND")
            .map(|raw| raw.trim().parse::<u64>().context("Invalid WITNESS_BOUND"))
            .transpose()?
            .map(ValueBound::new);

        let hash = lookup("WITNESS_HASH")
            .map(|raw| raw.parse::<HashKind>().map_err(anyhow::Error::msg))
            .transpose()
            .context("Invalid WITNESS_HASH")?;

        Ok(Self { bound, hash })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Invalid profile {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn apply(&self, profile: &mut CircuitProfile) {
        if let Some(bound) = self.bound {
            profile.bound = bound;
        }
        if let Some(hash) = self.hash {
            profile.hash = hash;
        }
    }
}

/// Fold override layers onto the defaults, later layers winning.
pub fn resolve(layers: &[ProfileOverrides]) -> CircuitProfile {
    let mut profile = CircuitProfile::default();
    for layer in layers {
        layer.apply(&mut profile);
    }
    debug!(bound = profile.bound.max(), hash = %profile.hash, "circuit profile resolved");
    profile
}
