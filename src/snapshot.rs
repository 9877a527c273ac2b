//! Canonical snapshot serialization.
//!
//! The snapshot is the build's only artifact: a JSON object mapping each
//! account address to `{balance, nonce, code, storage}`. Downstream
//! tooling hashes and diffs this file, so canonical form is a correctness
//! requirement, not cosmetics: the outer map is ordered by address as an
//! unsigned integer and each storage map by slot key as an unsigned
//! integer. Both orderings fall out of `BTreeMap` keys (fixed-width
//! big-endian bytes order identically to their numeric values), so
//! serialization never sorts and identical input state always yields
//! byte-identical output.

use crate::errors::LoadError;
use crate::state::GenesisState;
use alloy_genesis::GenesisAccount;
use alloy_primitives::Address;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Converts the ledger into the alloc representation used on disk.
pub fn to_alloc(state: &GenesisState) -> BTreeMap<Address, GenesisAccount> {
    state
        .iter()
        .map(|(addr, account)| {
            (
                *addr,
                GenesisAccount {
                    balance: account.balance,
                    nonce: (account.nonce != 0).then_some(account.nonce),
                    code: (!account.code.is_empty()).then(|| account.code.clone()),
                    storage: (!account.storage.is_empty()).then(|| account.storage.clone()),
                    private_key: None,
                },
            )
        })
        .collect()
}

/// Serializes the ledger to its canonical JSON text.
pub fn to_json(state: &GenesisState) -> String {
    let mut json = serde_json::to_string_pretty(&to_alloc(state))
        .expect("alloc serialization does not fail");
    json.push('\n');
    json
}

/// Writes the canonical snapshot file.
pub fn write_snapshot_file(state: &GenesisState, path: &Path) -> Result<(), LoadError> {
    fs::write(path, to_json(state)).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
