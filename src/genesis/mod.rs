//! Genesis state construction.
//!
//! One deterministic, single-threaded pass builds the complete initial
//! ledger of the chain:
//!
//! ```text
//!   precompile balances → proxy window → implementations
//!     (per-contract setup & verification) → dev funding
//! ```
//!
//! Ordering is load-bearing: proxies must exist before implementation
//! pointers are checked against them, implementation-side setup must
//! precede proxy-side setup, and scratch accounts must be erased before
//! the ledger reaches the serializer. Every invariant failure aborts the
//! whole build; no partial state is ever returned.

mod implementations;
mod init;
mod proxies;

use crate::artifacts::ArtifactProvider;
use crate::config::DeployConfig;
use crate::errors::GenesisBuildError;
use crate::predeploys::PRECOMPILE_COUNT;
use crate::registry::AddressRegistry;
use crate::state::GenesisState;
use alloy_primitives::{Address, U256};

/// Summary of what a build pass produced, for operator output.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Precompile addresses that received the 1-wei floor
    pub precompiles_funded: usize,
    /// Proxies installed across the window
    pub proxies_installed: usize,
    /// Implementations placed
    pub implementations_placed: usize,
    /// Contracts taken through the two-phase setup protocol
    pub contracts_initialized: usize,
    /// Whether the governance token was deployed
    pub governance_deployed: bool,
    /// Dev accounts funded; `None` when funding is disabled
    pub dev_accounts_funded: Option<usize>,
}

/// Builds the complete genesis ledger from the deployment configuration,
/// the L1 address registry and the compiled artifact set.
///
/// Re-running with identical inputs produces an identical ledger.
pub fn build_genesis(
    config: &DeployConfig,
    registry: &AddressRegistry,
    artifacts: &impl ArtifactProvider,
) -> Result<(GenesisState, BuildReport), GenesisBuildError> {
    let mut state = GenesisState::new();

    let precompiles_funded = fund_precompiles(&mut state);
    let proxies_installed = proxies::set_proxies(&mut state)?;
    let placements = implementations::set_implementations(&mut state, config, registry, artifacts)?;
    let dev_accounts_funded = if config.fund_dev_accounts {
        Some(fund_dev_accounts(&mut state, config)?)
    } else {
        None
    };

    let report = BuildReport {
        precompiles_funded,
        proxies_installed,
        implementations_placed: placements.placed,
        contracts_initialized: placements.initialized,
        governance_deployed: placements.governance_deployed,
        dev_accounts_funded,
    };
    Ok((state, report))
}

/// Gives every precompile address a nonzero balance so the account is
/// never treated as empty. Already-funded addresses are left unchanged,
/// so re-running is safe.
fn fund_precompiles(state: &mut GenesisState) -> usize {
    let mut funded = 0;
    for index in 0..PRECOMPILE_COUNT {
        let mut bytes = [0u8; 20];
        bytes[18..20].copy_from_slice(&(index as u16).to_be_bytes());
        let addr = Address::from(bytes);
        if state.balance(addr).is_zero() {
            state.add_balance(addr, U256::from(1));
            funded += 1;
        }
    }
    funded
}

/// Credits every configured dev account and verifies the result. Any
/// balance mismatch aborts the build naming the offending account.
fn fund_dev_accounts(
    state: &mut GenesisState,
    config: &DeployConfig,
) -> Result<usize, GenesisBuildError> {
    for addr in &config.dev_accounts {
        state.add_balance(*addr, config.dev_account_fund_amount);
    }
    for addr in &config.dev_accounts {
        let found = state.balance(*addr);
        if found != config.dev_account_fund_amount {
            return Err(GenesisBuildError::DevAccountBalance {
                address: *addr,
                expected: config.dev_account_fund_amount,
                found,
            });
        }
    }
    Ok(config.dev_accounts.len())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::artifacts::{Artifact, ArtifactSet};
    use crate::config::WithdrawalNetwork;
    use crate::predeploys::{
        is_defined_predeploy, not_proxied, predeploy, to_namespace, window_address,
        DeployStrategy, EIP1967_ADMIN_SLOT, EIP1967_IMPLEMENTATION_SLOT, GOVERNANCE_TOKEN,
        PREDEPLOYS, PREDEPLOY_COUNT, PROXY_ADMIN, SCRATCH_DEPLOYER,
    };
    use crate::snapshot;
    use alloy_primitives::{address, b256, B256};
    use std::collections::BTreeMap;

    /// Deploy config used across the genesis test suite.
    pub(crate) fn fixture_config() -> DeployConfig {
        DeployConfig {
            l1_chain_id: 11,
            sequencer_fee_vault_recipient: address!("0000000000000000000000000000000000001111"),
            sequencer_fee_vault_minimum_withdrawal_amount: U256::from(10u64).pow(U256::from(18u64)),
            sequencer_fee_vault_withdrawal_network: WithdrawalNetwork::L1,
            base_fee_vault_recipient: address!("0000000000000000000000000000000000002222"),
            base_fee_vault_minimum_withdrawal_amount: U256::from(10u64).pow(U256::from(18u64)),
            base_fee_vault_withdrawal_network: WithdrawalNetwork::L1,
            l1_fee_vault_recipient: address!("0000000000000000000000000000000000003333"),
            l1_fee_vault_minimum_withdrawal_amount: U256::from(10u64).pow(U256::from(18u64)),
            l1_fee_vault_withdrawal_network: WithdrawalNetwork::L2,
            enable_governance: true,
            governance_token_owner: address!("0000000000000000000000000000000000004444"),
            fund_dev_accounts: false,
            dev_account_fund_amount: U256::from(1000),
            dev_accounts: vec![
                address!("00000000000000000000000000000000000d0001"),
                address!("00000000000000000000000000000000000d0002"),
                address!("00000000000000000000000000000000000d0003"),
            ],
        }
    }

    /// Registry with the three L1 counterparts the initializers need.
    pub(crate) fn fixture_registry() -> AddressRegistry {
        let mut registry = AddressRegistry::new();
        registry.insert(
            "L1CrossDomainMessengerProxy",
            address!("00000000000000000000000000000000000000c1"),
        );
        registry.insert(
            "L1StandardBridgeProxy",
            address!("00000000000000000000000000000000000000b1"),
        );
        registry.insert(
            "L1ERC721BridgeProxy",
            address!("00000000000000000000000000000000000000e7"),
        );
        registry
    }

    /// One artifact per registered predeploy. Plain contracts get a
    /// distinctive marker body; immutable-carrying contracts get a
    /// template with placeholder words at known offsets.
    pub(crate) fn fixture_artifacts() -> ArtifactSet {
        let mut set = ArtifactSet::new();
        for (index, desc) in PREDEPLOYS.iter().enumerate() {
            let artifact = match desc.strategy {
                DeployStrategy::ConstructorWithImmutables
                    if desc.name == "MintableERC721Factory" =>
                {
                    Artifact {
                        runtime_code: vec![0xfe; 68].into(),
                        immutable_refs: BTreeMap::from([
                            ("BRIDGE".to_string(), vec![4]),
                            ("REMOTE_CHAIN_ID".to_string(), vec![36]),
                        ]),
                    }
                }
                DeployStrategy::ConstructorWithImmutables => Artifact {
                    runtime_code: vec![0xfe; 100].into(),
                    immutable_refs: BTreeMap::from([
                        ("RECIPIENT".to_string(), vec![4]),
                        ("MIN_WITHDRAWAL_AMOUNT".to_string(), vec![36]),
                        ("WITHDRAWAL_NETWORK".to_string(), vec![68]),
                    ]),
                },
                _ => Artifact {
                    runtime_code: vec![0x60, index as u8, 0x60, 0x01, 0x00].into(),
                    immutable_refs: BTreeMap::new(),
                },
            };
            set.insert(desc.name, artifact);
        }
        set
    }

    fn build(config: &DeployConfig) -> (GenesisState, BuildReport) {
        build_genesis(config, &fixture_registry(), &fixture_artifacts()).unwrap()
    }

    #[test]
    fn test_precompiles_hold_the_one_wei_floor() {
        let (state, report) = build(&fixture_config());
        assert_eq!(report.precompiles_funded, PRECOMPILE_COUNT);
        for byte in [0u8, 1, 9, 0xff] {
            let mut bytes = [0u8; 20];
            bytes[19] = byte;
            assert_eq!(state.balance(Address::from(bytes)), U256::from(1));
        }
    }

    #[test]
    fn test_precompile_funding_is_idempotent() {
        let mut state = GenesisState::new();
        assert_eq!(fund_precompiles(&mut state), PRECOMPILE_COUNT);
        // Second run finds every account non-empty and changes nothing
        assert_eq!(fund_precompiles(&mut state), 0);
        let mut bytes = [0u8; 20];
        bytes[19] = 4;
        assert_eq!(state.balance(Address::from(bytes)), U256::from(1));
    }

    // Scenario A: dev funding and governance both disabled.
    #[test]
    fn test_scenario_a_window_coverage_without_governance() {
        let mut config = fixture_config();
        config.enable_governance = false;
        config.fund_dev_accounts = false;
        let (state, report) = build(&config);

        // Full window minus the exclusion set carries proxies
        assert_eq!(report.proxies_installed, PREDEPLOY_COUNT - 2);
        for index in 0..PREDEPLOY_COUNT {
            let addr = window_address(index);
            if not_proxied(addr) {
                continue;
            }
            assert_eq!(
                state.storage(addr, EIP1967_ADMIN_SLOT),
                PROXY_ADMIN.into_word()
            );
            if is_defined_predeploy(addr) {
                assert_eq!(
                    state.storage(addr, EIP1967_IMPLEMENTATION_SLOT),
                    to_namespace(addr).unwrap().into_word()
                );
            }
        }

        // Implementation entries exist for every descriptor except the token
        for desc in PREDEPLOYS.iter().filter(|d| d.address != GOVERNANCE_TOKEN) {
            let target = if desc.proxied {
                to_namespace(desc.address).unwrap()
            } else {
                desc.address
            };
            assert!(!state.code(target).is_empty(), "{} has no code", desc.name);
        }

        assert!(!state.contains(GOVERNANCE_TOKEN), "no governance-token entry");
        assert_eq!(report.dev_accounts_funded, None);
        assert!(!report.governance_deployed);
    }

    // Scenario B: three dev accounts, 1000 units each.
    #[test]
    fn test_scenario_b_dev_funding_is_exact_and_isolated() {
        let mut funded_config = fixture_config();
        funded_config.fund_dev_accounts = true;
        let (funded, report) = build(&funded_config);
        assert_eq!(report.dev_accounts_funded, Some(3));

        for addr in &funded_config.dev_accounts {
            assert_eq!(funded.balance(*addr), U256::from(1000));
        }

        // No other account's balance moved as a side effect of funding
        let (unfunded, _) = build(&fixture_config());
        for (addr, account) in funded.iter() {
            if funded_config.dev_accounts.contains(addr) {
                continue;
            }
            assert_eq!(
                account.balance,
                unfunded.balance(*addr),
                "funding leaked into {addr}"
            );
        }
    }

    #[test]
    fn test_dev_funding_balance_mismatch_is_fatal() {
        let mut config = fixture_config();
        config.fund_dev_accounts = true;
        // Listing an account twice double-credits it and must fail the
        // exact-balance verification
        config.dev_accounts.push(config.dev_accounts[0]);

        let err = build_genesis(&config, &fixture_registry(), &fixture_artifacts()).unwrap_err();
        assert!(matches!(
            err,
            GenesisBuildError::DevAccountBalance { address, .. }
                if address == config.dev_accounts[0]
        ));
    }

    // Scenario C: governance enabled with a configured owner.
    #[test]
    fn test_scenario_c_governance_token_with_owner() {
        let config = fixture_config();
        let (state, report) = build(&config);

        assert!(report.governance_deployed);
        assert!(!state.code(GOVERNANCE_TOKEN).is_empty());
        assert_eq!(
            state.storage(
                GOVERNANCE_TOKEN,
                b256!("0000000000000000000000000000000000000000000000000000000000000003")
            ),
            b256!("4d6572696469616e000000000000000000000000000000000000000000000010")
        );
        assert_eq!(
            state.storage(
                GOVERNANCE_TOKEN,
                b256!("0000000000000000000000000000000000000000000000000000000000000004")
            ),
            b256!("4d45520000000000000000000000000000000000000000000000000000000006")
        );
        assert_eq!(
            state.storage(
                GOVERNANCE_TOKEN,
                b256!("000000000000000000000000000000000000000000000000000000000000000a")
            ),
            config.governance_token_owner.into_word()
        );
        assert!(!state.contains(SCRATCH_DEPLOYER), "scratch must be erased");
    }

    #[test]
    fn test_initializable_contracts_are_terminal_at_both_addresses() {
        let (state, report) = build(&fixture_config());
        let initialized: Vec<_> =
            PREDEPLOYS.iter().filter(|d| d.initializer.is_some()).collect();
        assert_eq!(report.contracts_initialized, initialized.len());

        for desc in initialized {
            let flag = B256::with_last_byte(1);
            assert_eq!(state.storage(desc.address, B256::ZERO), flag);
            assert_eq!(
                state.storage(to_namespace(desc.address).unwrap(), B256::ZERO),
                flag
            );
        }
    }

    #[test]
    fn test_initializer_reads_the_registry() {
        let desc = predeploy(crate::predeploys::L2_STANDARD_BRIDGE).unwrap();
        let (state, _) = build(&fixture_config());
        assert_eq!(
            state.storage(
                desc.address,
                b256!("0000000000000000000000000000000000000000000000000000000000000001")
            ),
            address!("00000000000000000000000000000000000000b1").into_word()
        );
    }

    #[test]
    fn test_missing_l1_counterpart_aborts() {
        let err = build_genesis(&fixture_config(), &AddressRegistry::new(), &fixture_artifacts())
            .unwrap_err();
        assert!(matches!(err, GenesisBuildError::MissingL1Contract { .. }));
    }

    #[test]
    fn test_rebuilding_identical_inputs_is_byte_identical() {
        let config = fixture_config();
        let (first, _) = build(&config);
        let (second, _) = build(&config);
        assert_eq!(
            snapshot::to_json(&first),
            snapshot::to_json(&second),
            "identical inputs must serialize byte-identically"
        );
    }
}
