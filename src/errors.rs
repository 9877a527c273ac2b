use alloy_primitives::{Address, U256};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort a genesis build.
///
/// Every variant is fatal: the build is deterministic, so nothing is
/// retried and no partial snapshot is ever written.
#[derive(Debug, Error)]
pub enum GenesisBuildError {
    /// An address outside the predeploy window was handed to a
    /// window-only operation. This is a caller bug, not an input problem.
    #[error("address {0} is not a predeploy window address")]
    NotAPredeploy(Address),

    /// A logical contract name is absent from the L1 address registry.
    #[error("L1 contract {name} is missing from the address registry")]
    MissingL1Contract {
        /// Registry key that failed to resolve
        name: String,
    },

    /// The code provider has no compiled artifact for a contract.
    #[error("no compiled artifact for contract {name}")]
    MissingArtifact {
        /// Contract name that failed to resolve
        name: String,
    },

    /// An artifact exists but cannot be used as retrieved.
    #[error("artifact for {name} is malformed: {reason}")]
    InvalidArtifact {
        /// Contract name
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// A proxy's implementation pointer does not match the computed
    /// namespace address of its implementation.
    #[error("proxy {proxy} implementation slot holds {found}, expected {expected}")]
    ImplementationSlotMismatch {
        /// The proxy whose pointer is wrong
        proxy: Address,
        /// Namespace address the pointer must hold
        expected: Address,
        /// Address actually recorded in the slot
        found: Address,
    },

    /// A setup routine was invoked on an account that is already
    /// initialized.
    #[error("contract at {address} is already initialized")]
    AlreadyInitialized {
        /// Account whose initialized flag is set
        address: Address,
    },

    /// A setup routine accepted a second invocation. Repeatable
    /// initialization would let the implementation be hijacked through
    /// the proxy pattern's public implementation address.
    #[error("contract at {address} accepted a repeated initialization")]
    ReinitializationNotBlocked {
        /// Account that failed the terminal-initialization check
        address: Address,
    },

    /// A dev account ended up with the wrong balance after funding.
    #[error("dev account {address} holds {found} after funding, expected {expected}")]
    DevAccountBalance {
        /// The offending account
        address: Address,
        /// Configured fund amount
        expected: U256,
        /// Balance actually observed
        found: U256,
    },
}

/// Errors raised while loading external inputs (deploy config, L1 address
/// registry, contract artifacts) or writing the snapshot file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be read or written
    #[error("failed to access {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// File contents are not valid JSON for the expected shape
    #[error("failed to parse {path}: {source}")]
    Json {
        /// Offending path
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },
}
