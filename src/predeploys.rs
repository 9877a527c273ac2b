//! Predeploy address space model and descriptor registry.
//!
//! The 20-byte address space is partitioned into three disjoint ranges that
//! matter to genesis construction:
//!
//! - *precompiles*: the low sequential addresses `0x00..=0xff`, which must
//!   never be empty accounts;
//! - *predeploy window*: 2048 consecutive addresses starting at
//!   `0x4200…0000`, which carry upgradeable proxies (minus a small
//!   exclusion set);
//! - *code namespace*: the shadow address of each window slot, derived by
//!   substituting the fixed `0xc0d3…` prefix while keeping the low two
//!   bytes. Implementations live here; proxies point at them.
//!
//! The prefix substitution is part of the genesis format: every tool that
//! reproduces this state must derive identical namespace addresses.

use crate::errors::GenesisBuildError;
use alloy_primitives::{address, b256, Address, B256};

/// First address of the predeploy window.
pub const PREDEPLOY_NAMESPACE: Address = address!("4200000000000000000000000000000000000000");

/// Number of proxy slots in the predeploy window.
pub const PREDEPLOY_COUNT: usize = 2048;

/// Number of low addresses kept non-empty for precompiles (0x00..=0xff).
pub const PRECOMPILE_COUNT: usize = 256;

/// Prefix of the implementation (code namespace) range. The low two bytes
/// are taken from the predeploy address; the high eighteen bytes are fixed.
pub const CODE_NAMESPACE: Address = address!("c0d3c0d3c0d3c0d3c0d3c0d3c0d3c0d3c0d30000");

/// Scratch account used to stage constructor-produced code. Erased before
/// serialization; must never appear in the final snapshot.
pub const SCRATCH_DEPLOYER: Address = address!("00000000000000000000000000000000005c7a7c");

// ── Well-known predeploy addresses ─────────────────────────────────

/// Pre-regenesis message passer kept for storage compatibility.
pub const LEGACY_MESSAGE_PASSER: Address = address!("4200000000000000000000000000000000000000");
/// Deprecated deployer allow-list from the legacy system.
pub const DEPLOYER_WHITELIST: Address = address!("4200000000000000000000000000000000000002");
/// Wrapped ether. Lives unproxied at its well-known address.
pub const WETH9: Address = address!("4200000000000000000000000000000000000006");
/// L2 side of the cross-domain messenger pair.
pub const L2_CROSS_DOMAIN_MESSENGER: Address =
    address!("4200000000000000000000000000000000000007");
/// Fee parameter oracle.
pub const GAS_PRICE_ORACLE: Address = address!("420000000000000000000000000000000000000f");
/// L2 side of the standard token bridge.
pub const L2_STANDARD_BRIDGE: Address = address!("4200000000000000000000000000000000000010");
/// Accumulates sequencer fees until withdrawal.
pub const SEQUENCER_FEE_VAULT: Address = address!("4200000000000000000000000000000000000011");
/// Factory for bridged ERC-20 representations.
pub const MINTABLE_ERC20_FACTORY: Address = address!("4200000000000000000000000000000000000012");
/// Legacy block-number shim.
pub const L1_BLOCK_NUMBER: Address = address!("4200000000000000000000000000000000000013");
/// L2 side of the ERC-721 bridge.
pub const L2_ERC721_BRIDGE: Address = address!("4200000000000000000000000000000000000014");
/// Holds the latest known L1 block attributes.
pub const L1_BLOCK: Address = address!("4200000000000000000000000000000000000015");
/// Initiates withdrawals to L1.
pub const L2_TO_L1_MESSAGE_PASSER: Address = address!("4200000000000000000000000000000000000016");
/// Factory for bridged ERC-721 representations.
pub const MINTABLE_ERC721_FACTORY: Address = address!("4200000000000000000000000000000000000017");
/// Owns every proxy in the window.
pub const PROXY_ADMIN: Address = address!("4200000000000000000000000000000000000018");
/// Accumulates base fees until withdrawal.
pub const BASE_FEE_VAULT: Address = address!("4200000000000000000000000000000000000019");
/// Accumulates L1 data fees until withdrawal.
pub const L1_FEE_VAULT: Address = address!("420000000000000000000000000000000000001a");
/// Governance token. Lives unproxied at its well-known address and is only
/// deployed when governance is enabled.
pub const GOVERNANCE_TOKEN: Address = address!("4200000000000000000000000000000000000042");

// ── EIP-1967 proxy slots ───────────────────────────────────────────

/// Implementation pointer slot: `keccak256("eip1967.proxy.implementation") - 1`.
pub const EIP1967_IMPLEMENTATION_SLOT: B256 =
    b256!("360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc");

/// Admin pointer slot: `keccak256("eip1967.proxy.admin") - 1`.
pub const EIP1967_ADMIN_SLOT: B256 =
    b256!("b53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103");

// ── Address space predicates ───────────────────────────────────────

/// Whether `addr` is in the precompile range (0x00..=0xff).
pub fn is_precompile(addr: Address) -> bool {
    addr.as_slice()[..19].iter().all(|b| *b == 0)
}

/// Index of `addr` within the predeploy window, or `None` outside it.
pub fn proxy_range_index(addr: Address) -> Option<usize> {
    let bytes = addr.as_slice();
    if bytes[..18] != PREDEPLOY_NAMESPACE.as_slice()[..18] {
        return None;
    }
    let index = u16::from_be_bytes([bytes[18], bytes[19]]) as usize;
    (index < PREDEPLOY_COUNT).then_some(index)
}

/// The window address at `index`. Panics on an out-of-range index; callers
/// iterate `0..PREDEPLOY_COUNT`.
pub fn window_address(index: usize) -> Address {
    assert!(index < PREDEPLOY_COUNT, "predeploy index out of range");
    let mut bytes = PREDEPLOY_NAMESPACE.into_array();
    bytes[18..20].copy_from_slice(&(index as u16).to_be_bytes());
    Address::from(bytes)
}

/// Window addresses that must NOT receive proxy code. WETH9 and the
/// governance token hold their own code at their well-known addresses.
pub fn not_proxied(addr: Address) -> bool {
    addr == WETH9 || addr == GOVERNANCE_TOKEN
}

/// Whether `addr` has a registered [`PredeployDescriptor`].
pub fn is_defined_predeploy(addr: Address) -> bool {
    PREDEPLOYS.iter().any(|p| p.address == addr)
}

/// Descriptor lookup by window address.
pub fn predeploy(addr: Address) -> Option<&'static PredeployDescriptor> {
    PREDEPLOYS.iter().find(|p| p.address == addr)
}

/// Maps a predeploy window address to its implementation shadow address:
/// the fixed `0xc0d3…` prefix with the predeploy's low two bytes.
///
/// This substitution is a pure bijection over the window and must be
/// identical in every implementation for genesis compatibility.
pub fn to_namespace(addr: Address) -> Result<Address, GenesisBuildError> {
    if proxy_range_index(addr).is_none() {
        return Err(GenesisBuildError::NotAPredeploy(addr));
    }
    let mut bytes = CODE_NAMESPACE.into_array();
    bytes[18..20].copy_from_slice(&addr.as_slice()[18..20]);
    Ok(Address::from(bytes))
}

// ── Descriptors ────────────────────────────────────────────────────

/// How a predeploy's code may safely reach its final address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStrategy {
    /// Compiled runtime code is copied verbatim to the namespace address.
    /// Valid only for contracts with no constructor side effects and no
    /// immutable values baked into their bytecode.
    DirectInjection,
    /// The contract embeds immutable values at construction time, so the
    /// runtime code must be produced by running its constructor (modeled
    /// as immutable-word splicing on a scratch account) before being
    /// copied to the namespace address.
    ConstructorWithImmutables,
    /// The contract is not proxied but must exist at an exact predeploy
    /// address where its constructor cannot run: constructed on a scratch
    /// account, code copied to the target, then specific storage slots
    /// overwritten with literal padded words.
    ConstructorThenCopy,
}

/// Where a setup-routine argument value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitArgSource {
    /// Looked up in the L1 address registry under this logical name.
    L1Contract(&'static str),
    /// The address of another predeploy on this chain.
    Predeploy(Address),
}

/// One setup-routine argument: the storage slot it lands in and the source
/// of its value. The neutral (implementation-side) phase writes a zero
/// word instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitArg {
    /// Storage slot the argument is written to
    pub slot: B256,
    /// Source of the real argument value
    pub source: InitArgSource,
}

/// Static description of a contract's one-time setup routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitializerSpec {
    /// Argument shape, in slot order
    pub args: &'static [InitArg],
}

/// A contract that must exist from the first block of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredeployDescriptor {
    /// Contract name, as known to the code provider
    pub name: &'static str,
    /// Well-known window address
    pub address: Address,
    /// Whether the window address carries a forwarding proxy
    pub proxied: bool,
    /// Deployment-safety strategy
    pub strategy: DeployStrategy,
    /// One-time setup routine, if the contract has one
    pub initializer: Option<InitializerSpec>,
}

const SLOT_1: B256 = b256!("0000000000000000000000000000000000000000000000000000000000000001");

/// Every registered predeploy, with its deployment strategy made explicit.
///
/// Contracts not listed here still get a proxy in the window (unless
/// excluded) but no implementation. Storage slot 1 holds the single
/// address argument of each setup routine; slot 0 is the initialized flag
/// (see `genesis::init`).
pub static PREDEPLOYS: &[PredeployDescriptor] = &[
    PredeployDescriptor {
        name: "LegacyMessagePasser",
        address: LEGACY_MESSAGE_PASSER,
        proxied: true,
        strategy: DeployStrategy::DirectInjection,
        initializer: None,
    },
    PredeployDescriptor {
        name: "DeployerWhitelist",
        address: DEPLOYER_WHITELIST,
        proxied: true,
        strategy: DeployStrategy::DirectInjection,
        initializer: None,
    },
    PredeployDescriptor {
        name: "WETH9",
        address: WETH9,
        proxied: false,
        strategy: DeployStrategy::ConstructorThenCopy,
        initializer: None,
    },
    PredeployDescriptor {
        name: "L2CrossDomainMessenger",
        address: L2_CROSS_DOMAIN_MESSENGER,
        proxied: true,
        strategy: DeployStrategy::DirectInjection,
        initializer: Some(InitializerSpec {
            args: &[InitArg {
                slot: SLOT_1,
                source: InitArgSource::L1Contract("L1CrossDomainMessengerProxy"),
            }],
        }),
    },
    PredeployDescriptor {
        name: "GasPriceOracle",
        address: GAS_PRICE_ORACLE,
        proxied: true,
        strategy: DeployStrategy::DirectInjection,
        initializer: None,
    },
    PredeployDescriptor {
        name: "L2StandardBridge",
        address: L2_STANDARD_BRIDGE,
        proxied: true,
        strategy: DeployStrategy::DirectInjection,
        initializer: Some(InitializerSpec {
            args: &[InitArg {
                slot: SLOT_1,
                source: InitArgSource::L1Contract("L1StandardBridgeProxy"),
            }],
        }),
    },
    PredeployDescriptor {
        name: "SequencerFeeVault",
        address: SEQUENCER_FEE_VAULT,
        proxied: true,
        strategy: DeployStrategy::ConstructorWithImmutables,
        initializer: None,
    },
    PredeployDescriptor {
        name: "MintableERC20Factory",
        address: MINTABLE_ERC20_FACTORY,
        proxied: true,
        strategy: DeployStrategy::DirectInjection,
        initializer: Some(InitializerSpec {
            args: &[InitArg {
                slot: SLOT_1,
                source: InitArgSource::Predeploy(L2_STANDARD_BRIDGE),
            }],
        }),
    },
    PredeployDescriptor {
        name: "L1BlockNumber",
        address: L1_BLOCK_NUMBER,
        proxied: true,
        strategy: DeployStrategy::DirectInjection,
        initializer: None,
    },
    PredeployDescriptor {
        name: "L2ERC721Bridge",
        address: L2_ERC721_BRIDGE,
        proxied: true,
        strategy: DeployStrategy::DirectInjection,
        initializer: Some(InitializerSpec {
            args: &[InitArg {
                slot: SLOT_1,
                source: InitArgSource::L1Contract("L1ERC721BridgeProxy"),
            }],
        }),
    },
    PredeployDescriptor {
        name: "L1Block",
        address: L1_BLOCK,
        proxied: true,
        strategy: DeployStrategy::DirectInjection,
        initializer: None,
    },
    PredeployDescriptor {
        name: "L2ToL1MessagePasser",
        address: L2_TO_L1_MESSAGE_PASSER,
        proxied: true,
        strategy: DeployStrategy::DirectInjection,
        initializer: None,
    },
    PredeployDescriptor {
        name: "MintableERC721Factory",
        address: MINTABLE_ERC721_FACTORY,
        proxied: true,
        strategy: DeployStrategy::ConstructorWithImmutables,
        initializer: None,
    },
    PredeployDescriptor {
        name: "ProxyAdmin",
        address: PROXY_ADMIN,
        proxied: true,
        strategy: DeployStrategy::DirectInjection,
        initializer: None,
    },
    PredeployDescriptor {
        name: "BaseFeeVault",
        address: BASE_FEE_VAULT,
        proxied: true,
        strategy: DeployStrategy::ConstructorWithImmutables,
        initializer: None,
    },
    PredeployDescriptor {
        name: "L1FeeVault",
        address: L1_FEE_VAULT,
        proxied: true,
        strategy: DeployStrategy::ConstructorWithImmutables,
        initializer: None,
    },
    PredeployDescriptor {
        name: "GovernanceToken",
        address: GOVERNANCE_TOKEN,
        proxied: false,
        strategy: DeployStrategy::ConstructorThenCopy,
        initializer: None,
    },
];
