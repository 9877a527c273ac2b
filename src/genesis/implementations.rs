//! Implementation placement for every registered predeploy.
//!
//! Dispatches on each descriptor's [`DeployStrategy`]:
//!
//! - `DirectInjection`: runtime code goes straight to the namespace
//!   address. Only sound for contracts with no constructor side effects
//!   and no immutables — anything else would be silently wrong bytecode.
//! - `ConstructorWithImmutables`: the constructor is modeled in-process
//!   by splicing the immutable words into the artifact's placeholder
//!   offsets; the result is staged on the scratch account and copied to
//!   the namespace address.
//! - `ConstructorThenCopy`: for unproxied contracts pinned to an exact
//!   window address. Constructed on the scratch account, copied to the
//!   target, then the storage slots a constructor would have populated
//!   are overwritten with literal padded words.
//!
//! Every scratch construction is erased in the same pass; the scratch
//! account must never survive into the snapshot. After each proxied
//! placement the owning proxy's implementation pointer is checked against
//! the computed namespace address — a mismatch aborts the build.

use crate::artifacts::{Artifact, ArtifactProvider};
use crate::config::DeployConfig;
use crate::errors::GenesisBuildError;
use crate::genesis::init;
use crate::predeploys::{
    to_namespace, DeployStrategy, PredeployDescriptor, EIP1967_IMPLEMENTATION_SLOT,
    GOVERNANCE_TOKEN, L2_ERC721_BRIDGE, PREDEPLOYS, SCRATCH_DEPLOYER,
};
use crate::registry::AddressRegistry;
use crate::state::GenesisState;
use alloy_primitives::{b256, Address, Bytes, B256, U256};

/// What the placement pass did, for the build report.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Placements {
    pub placed: usize,
    pub initialized: usize,
    pub governance_deployed: bool,
}

/// Places every registered implementation and runs each contract's setup
/// protocol. The governance token is skipped entirely when governance is
/// disabled.
pub(crate) fn set_implementations(
    state: &mut GenesisState,
    config: &DeployConfig,
    registry: &AddressRegistry,
    artifacts: &impl ArtifactProvider,
) -> Result<Placements, GenesisBuildError> {
    let mut placements = Placements::default();

    for desc in PREDEPLOYS {
        if desc.address == GOVERNANCE_TOKEN && !config.enable_governance {
            continue;
        }

        match desc.strategy {
            DeployStrategy::DirectInjection => {
                let code = artifacts.artifact(desc.name)?.runtime_code.clone();
                place_implementation(state, desc, code)?;
            }
            DeployStrategy::ConstructorWithImmutables => {
                let artifact = artifacts.artifact(desc.name)?;
                let values = immutable_values(desc, config);
                let constructed = splice_immutables(desc.name, artifact, &values)?;
                let code = construct_on_scratch(state, constructed);
                place_implementation(state, desc, code)?;
                state.erase(SCRATCH_DEPLOYER);
            }
            DeployStrategy::ConstructorThenCopy => {
                let artifact = artifacts.artifact(desc.name)?;
                let code = construct_on_scratch(state, artifact.runtime_code.clone());
                // The constructor cannot run at the well-known address, so
                // its storage effects are written out by hand.
                state.set_code(desc.address, code);
                state.set_nonce(desc.address, 1);
                for (slot, word) in storage_patch(desc, config) {
                    state.set_storage(desc.address, slot, word);
                }
                state.erase(SCRATCH_DEPLOYER);
            }
        }
        placements.placed += 1;
        if desc.address == GOVERNANCE_TOKEN {
            placements.governance_deployed = true;
        }

        if let Some(spec) = &desc.initializer {
            init::initialize_predeploy(state, desc, spec, registry)?;
            placements.initialized += 1;
        }
    }

    debug_assert!(!state.contains(SCRATCH_DEPLOYER));
    Ok(placements)
}

/// Installs `code` at the descriptor's namespace address and checks the
/// owning proxy's implementation pointer.
fn place_implementation(
    state: &mut GenesisState,
    desc: &PredeployDescriptor,
    code: Bytes,
) -> Result<(), GenesisBuildError> {
    let implementation = to_namespace(desc.address)?;
    state.set_code(implementation, code);
    state.set_nonce(implementation, 1);

    let found = state.storage(desc.address, EIP1967_IMPLEMENTATION_SLOT);
    if found != implementation.into_word() {
        return Err(GenesisBuildError::ImplementationSlotMismatch {
            proxy: desc.address,
            expected: implementation,
            found: Address::from_word(found),
        });
    }
    Ok(())
}

/// Models a constructor run: the code lands on the scratch account with a
/// deployed-contract nonce, and placement reads it back from there.
fn construct_on_scratch(state: &mut GenesisState, code: Bytes) -> Bytes {
    state.set_code(SCRATCH_DEPLOYER, code);
    state.set_nonce(SCRATCH_DEPLOYER, state.nonce(SCRATCH_DEPLOYER) + 1);
    state.code(SCRATCH_DEPLOYER)
}

/// Writes `values` over the 32-byte placeholder words recorded in the
/// artifact's immutable references.
fn splice_immutables(
    name: &str,
    artifact: &Artifact,
    values: &[(&'static str, B256)],
) -> Result<Bytes, GenesisBuildError> {
    let mut code = artifact.runtime_code.to_vec();
    for (immutable, word) in values {
        let offsets = artifact.immutable_refs.get(*immutable).ok_or_else(|| {
            GenesisBuildError::InvalidArtifact {
                name: name.to_string(),
                reason: format!("no immutable reference for {immutable}"),
            }
        })?;
        for &offset in offsets {
            let end = match offset.checked_add(32) {
                Some(end) if end <= code.len() => end,
                _ => {
                    return Err(GenesisBuildError::InvalidArtifact {
                        name: name.to_string(),
                        reason: format!(
                            "immutable {immutable} at offset {offset} exceeds code length {}",
                            code.len()
                        ),
                    })
                }
            };
            code[offset..end].copy_from_slice(word.as_slice());
        }
    }
    Ok(code.into())
}

/// Immutable words for contracts built under `ConstructorWithImmutables`.
fn immutable_values(desc: &PredeployDescriptor, config: &DeployConfig) -> Vec<(&'static str, B256)> {
    match desc.name {
        "SequencerFeeVault" => vec![
            ("RECIPIENT", config.sequencer_fee_vault_recipient.into_word()),
            (
                "MIN_WITHDRAWAL_AMOUNT",
                B256::from(config.sequencer_fee_vault_minimum_withdrawal_amount.to_be_bytes()),
            ),
            ("WITHDRAWAL_NETWORK", config.sequencer_fee_vault_withdrawal_network.as_word()),
        ],
        "BaseFeeVault" => vec![
            ("RECIPIENT", config.base_fee_vault_recipient.into_word()),
            (
                "MIN_WITHDRAWAL_AMOUNT",
                B256::from(config.base_fee_vault_minimum_withdrawal_amount.to_be_bytes()),
            ),
            ("WITHDRAWAL_NETWORK", config.base_fee_vault_withdrawal_network.as_word()),
        ],
        "L1FeeVault" => vec![
            ("RECIPIENT", config.l1_fee_vault_recipient.into_word()),
            (
                "MIN_WITHDRAWAL_AMOUNT",
                B256::from(config.l1_fee_vault_minimum_withdrawal_amount.to_be_bytes()),
            ),
            ("WITHDRAWAL_NETWORK", config.l1_fee_vault_withdrawal_network.as_word()),
        ],
        "MintableERC721Factory" => vec![
            ("BRIDGE", L2_ERC721_BRIDGE.into_word()),
            ("REMOTE_CHAIN_ID", B256::from(U256::from(config.l1_chain_id).to_be_bytes())),
        ],
        _ => Vec::new(),
    }
}

/// Constructor-equivalent storage for contracts placed by
/// `ConstructorThenCopy`, as literal padded words.
fn storage_patch(desc: &PredeployDescriptor, config: &DeployConfig) -> Vec<(B256, B256)> {
    match desc.name {
        // Storage layout:
        //   slot 0: name = "Wrapped Ether" (Solidity short string)
        //   slot 1: symbol = "WETH"
        //   slot 2: decimals = 18
        "WETH9" => vec![
            (
                B256::ZERO,
                b256!("577261707065642045746865720000000000000000000000000000000000001a"),
            ),
            (
                b256!("0000000000000000000000000000000000000000000000000000000000000001"),
                b256!("5745544800000000000000000000000000000000000000000000000000000008"),
            ),
            (
                b256!("0000000000000000000000000000000000000000000000000000000000000002"),
                b256!("0000000000000000000000000000000000000000000000000000000000000012"),
            ),
        ],
        // Storage layout (ERC20 + votes + ownable):
        //   slot 3: name = "Meridian" (Solidity short string)
        //   slot 4: symbol = "MER"
        //   slot 10: owner
        "GovernanceToken" => vec![
            (
                b256!("0000000000000000000000000000000000000000000000000000000000000003"),
                b256!("4d6572696469616e000000000000000000000000000000000000000000000010"),
            ),
            (
                b256!("0000000000000000000000000000000000000000000000000000000000000004"),
                b256!("4d45520000000000000000000000000000000000000000000000000000000006"),
            ),
            (
                b256!("000000000000000000000000000000000000000000000000000000000000000a"),
                config.governance_token_owner.into_word(),
            ),
        ],
        _ => Vec::new(),
    }
}
