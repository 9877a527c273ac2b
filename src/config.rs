//! Deployment configuration.
//!
//! A [`DeployConfig`] is loaded once per build from
//! `<deploy-config-dir>/<context>.json`, where `context` names the
//! deployment (e.g. `devnet`, `staging`, `mainnet`), and is threaded
//! read-only into every component that needs it. There is no global
//! configuration state.

use crate::errors::LoadError;
use alloy_primitives::{Address, B256, U256};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Which network a fee vault pays out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum WithdrawalNetwork {
    /// Withdrawals are sent through the bridge to L1
    L1 = 0,
    /// Withdrawals stay on L2
    L2 = 1,
}

impl TryFrom<u8> for WithdrawalNetwork {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::L1),
            1 => Ok(Self::L2),
            other => Err(format!("invalid withdrawal network {other}, expected 0 or 1")),
        }
    }
}

impl WithdrawalNetwork {
    /// The network selector as a 32-byte immutable word.
    pub fn as_word(self) -> B256 {
        B256::from(U256::from(self as u8).to_be_bytes())
    }
}

/// Configuration values consumed by genesis construction.
///
/// Field names follow the JSON deploy-config files produced by the L1
/// deployment tooling (camelCase).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeployConfig {
    /// Chain id of the L1 the bridges pair with
    pub l1_chain_id: u64,

    /// Sequencer fee vault payout recipient
    pub sequencer_fee_vault_recipient: Address,
    /// Minimum vault balance before a withdrawal may be triggered
    pub sequencer_fee_vault_minimum_withdrawal_amount: U256,
    /// Network the sequencer vault pays out on
    pub sequencer_fee_vault_withdrawal_network: WithdrawalNetwork,

    /// Base fee vault payout recipient
    pub base_fee_vault_recipient: Address,
    /// Minimum vault balance before a withdrawal may be triggered
    pub base_fee_vault_minimum_withdrawal_amount: U256,
    /// Network the base fee vault pays out on
    pub base_fee_vault_withdrawal_network: WithdrawalNetwork,

    /// L1 data fee vault payout recipient
    pub l1_fee_vault_recipient: Address,
    /// Minimum vault balance before a withdrawal may be triggered
    pub l1_fee_vault_minimum_withdrawal_amount: U256,
    /// Network the L1 data fee vault pays out on
    pub l1_fee_vault_withdrawal_network: WithdrawalNetwork,

    /// Whether the governance token is deployed at all
    pub enable_governance: bool,
    /// Initial owner of the governance token
    pub governance_token_owner: Address,

    /// Whether dev accounts are funded
    pub fund_dev_accounts: bool,
    /// Balance credited to each dev account
    pub dev_account_fund_amount: U256,
    /// Accounts to fund when `fund_dev_accounts` is set
    pub dev_accounts: Vec<Address>,
}

impl DeployConfig {
    /// Loads the configuration for the named deployment context from
    /// `dir/<context>.json`.
    pub fn load(dir: &Path, context: &str) -> Result<Self, LoadError> {
        let path = dir.join(format!("{context}.json"));
        let raw = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| LoadError::Json { path, source })
    }
}
