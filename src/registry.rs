//! L1 address registry.
//!
//! The L1 deployment phase records the address of every contract it
//! deploys under a logical name (`"L1StandardBridgeProxy"`, …). Genesis
//! construction reads those addresses to wire the L2 side of each bridge
//! pair. The registry is resolved once at startup; a missing name is fatal
//! at the point of use — the input set is fixed, so retrying cannot help.

use crate::errors::{GenesisBuildError, LoadError};
use alloy_primitives::Address;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Logical contract name → deployed L1 address.
#[derive(Debug, Clone, Default)]
pub struct AddressRegistry {
    contracts: BTreeMap<String, Address>,
}

impl AddressRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a registry from a JSON object of name → address.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let contracts = serde_json::from_str(&raw).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { contracts })
    }

    /// Registers a name. Used by tests and by tooling that assembles a
    /// registry programmatically.
    pub fn insert(&mut self, name: impl Into<String>, address: Address) {
        self.contracts.insert(name.into(), address);
    }

    /// Resolves a logical name to its L1 address.
    pub fn get(&self, name: &str) -> Result<Address, GenesisBuildError> {
        self.contracts
            .get(name)
            .copied()
            .ok_or_else(|| GenesisBuildError::MissingL1Contract { name: name.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_get_resolves_registered_names() {
        let mut registry = AddressRegistry::new();
        let bridge = address!("00000000000000000000000000000000000000b1");
        registry.insert("L1StandardBridgeProxy", bridge);
        assert_eq!(registry.get("L1StandardBridgeProxy").unwrap(), bridge);
    }

    #[test]
    fn test_missing_name_is_fatal() {
        let registry = AddressRegistry::new();
        let err = registry.get("L1CrossDomainMessengerProxy").unwrap_err();
        assert!(matches!(
            err,
            GenesisBuildError::MissingL1Contract { name } if name == "L1CrossDomainMessengerProxy"
        ));
    }

    #[test]
    fn test_load_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("l1.json");
        std::fs::write(
            &path,
            r#"{"L1ERC721BridgeProxy": "0x00000000000000000000000000000000000000e7"}"#,
        )
        .unwrap();

        let registry = AddressRegistry::load(&path).unwrap();
        assert_eq!(
            registry.get("L1ERC721BridgeProxy").unwrap(),
            address!("00000000000000000000000000000000000000e7")
        );
    }
}
