//! Compiled contract artifacts (the code provider).
//!
//! Genesis construction never compiles anything; it consumes a prepared
//! artifact set keyed by contract name. Each artifact carries the runtime
//! bytecode and, for contracts with immutable values, the byte offsets at
//! which the compiler left 32-byte placeholder words (the shape of a forge
//! artifact's `immutableReferences`).

use crate::errors::{GenesisBuildError, LoadError};
use alloy_primitives::Bytes;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One compiled contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Artifact {
    /// Runtime (deployed) bytecode, hex encoded in the source file
    pub runtime_code: Bytes,
    /// Immutable name → offsets of its 32-byte word within `runtime_code`
    #[serde(default)]
    pub immutable_refs: BTreeMap<String, Vec<usize>>,
}

/// Source of compiled bytecode for named contracts.
///
/// The build consumes this seam; production uses [`ArtifactSet`] loaded
/// from disk, tests register fixtures directly.
pub trait ArtifactProvider {
    /// The artifact for `name`, or a fatal error if none exists.
    fn artifact(&self, name: &str) -> Result<&Artifact, GenesisBuildError>;
}

/// Artifact set backed by a single JSON file of name → artifact.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ArtifactSet {
    artifacts: BTreeMap<String, Artifact>,
}

impl ArtifactSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an artifact set from a JSON file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Registers an artifact under `name`.
    pub fn insert(&mut self, name: impl Into<String>, artifact: Artifact) {
        self.artifacts.insert(name.into(), artifact);
    }
}

impl ArtifactProvider for ArtifactSet {
    fn artifact(&self, name: &str) -> Result<&Artifact, GenesisBuildError> {
        self.artifacts
            .get(name)
            .ok_or_else(|| GenesisBuildError::MissingArtifact { name: name.to_string() })
    }
}
