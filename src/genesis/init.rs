//! Two-phase initialization of upgradeable predeploys.
//!
//! Contracts behind a proxy expose their implementation at a public
//! namespace address. Leaving that implementation uninitialized would let
//! anyone claim it, so setup runs twice:
//!
//! 1. at the *implementation* address with neutral zero arguments — this
//!    exists purely to burn the one-time setup there;
//! 2. at the *proxy* address with the real configuration-derived
//!    arguments.
//!
//! Afterwards both invocations must be terminal: a repeatable setup
//! routine is a security-critical construction bug, so the verifier
//! re-invokes at both addresses and aborts the build unless each attempt
//! fails with the already-initialized condition.
//!
//! Storage model: slot 0 holds the initialized flag (low byte 1),
//! argument words land in the slots named by the descriptor's
//! [`InitializerSpec`]. Zero argument words follow storage semantics and
//! leave no entry behind.

use crate::errors::GenesisBuildError;
use crate::predeploys::{to_namespace, InitArgSource, InitializerSpec, PredeployDescriptor};
use crate::registry::AddressRegistry;
use crate::state::GenesisState;
use alloy_primitives::{b256, Address, B256};

/// Slot 0: the initialized flag.
const INITIALIZED_FLAG_SLOT: B256 = B256::ZERO;

/// Flag word once setup has run.
const INITIALIZED: B256 =
    b256!("0000000000000000000000000000000000000000000000000000000000000001");

/// Runs the one-time setup routine at `addr`, writing the given argument
/// words and setting the initialized flag.
///
/// Fails with [`GenesisBuildError::AlreadyInitialized`] iff the flag is
/// already set; a first invocation with valid arguments never fails.
pub(crate) fn invoke_initializer(
    state: &mut GenesisState,
    addr: Address,
    args: &[(B256, B256)],
) -> Result<(), GenesisBuildError> {
    if state.storage(addr, INITIALIZED_FLAG_SLOT) != B256::ZERO {
        return Err(GenesisBuildError::AlreadyInitialized { address: addr });
    }
    for (slot, word) in args {
        state.set_storage(addr, *slot, *word);
    }
    state.set_storage(addr, INITIALIZED_FLAG_SLOT, INITIALIZED);
    Ok(())
}

/// Resolves the real argument words for a setup routine. Registry misses
/// surface here, before any state is touched.
fn resolve_args(
    spec: &InitializerSpec,
    registry: &AddressRegistry,
) -> Result<Vec<(B256, B256)>, GenesisBuildError> {
    spec.args
        .iter()
        .map(|arg| {
            let value = match arg.source {
                InitArgSource::L1Contract(name) => registry.get(name)?,
                InitArgSource::Predeploy(addr) => addr,
            };
            Ok((arg.slot, value.into_word()))
        })
        .collect()
}

/// Runs the full two-phase protocol for one predeploy and verifies both
/// invocations are terminal.
pub(crate) fn initialize_predeploy(
    state: &mut GenesisState,
    desc: &PredeployDescriptor,
    spec: &InitializerSpec,
    registry: &AddressRegistry,
) -> Result<(), GenesisBuildError> {
    let implementation = to_namespace(desc.address)?;
    let real_args = resolve_args(spec, registry)?;
    let neutral_args: Vec<(B256, B256)> =
        real_args.iter().map(|(slot, _)| (*slot, B256::ZERO)).collect();

    // Phase 1: neutral setup at the implementation
    invoke_initializer(state, implementation, &neutral_args)?;
    // Phase 2: real setup through the proxy-facing address
    invoke_initializer(state, desc.address, &real_args)?;

    // Both must now reject any further setup attempt
    for target in [implementation, desc.address] {
        match invoke_initializer(state, target, &[]) {
            Err(GenesisBuildError::AlreadyInitialized { .. }) => {}
            Ok(()) => {
                return Err(GenesisBuildError::ReinitializationNotBlocked { address: target })
            }
            Err(other) => return Err(other),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predeploys::{predeploy, L2_CROSS_DOMAIN_MESSENGER, MINTABLE_ERC20_FACTORY};
    use alloy_primitives::address;

    const SLOT_1: B256 =
        b256!("0000000000000000000000000000000000000000000000000000000000000001");

    fn registry() -> AddressRegistry {
        let mut registry = AddressRegistry::new();
        registry.insert(
            "L1CrossDomainMessengerProxy",
            address!("00000000000000000000000000000000000000c1"),
        );
        registry
    }

    #[test]
    fn test_first_invocation_succeeds_and_sets_the_flag() {
        let mut state = GenesisState::new();
        let addr = address!("00000000000000000000000000000000000000aa");
        invoke_initializer(&mut state, addr, &[]).unwrap();
        assert_eq!(state.storage(addr, INITIALIZED_FLAG_SLOT), INITIALIZED);
    }

    #[test]
    fn test_second_invocation_fails() {
        let mut state = GenesisState::new();
        let addr = address!("00000000000000000000000000000000000000aa");
        invoke_initializer(&mut state, addr, &[]).unwrap();
        let err = invoke_initializer(&mut state, addr, &[]).unwrap_err();
        assert!(matches!(
            err,
            GenesisBuildError::AlreadyInitialized { address } if address == addr
        ));
    }

    #[test]
    fn test_two_phase_protocol_writes_real_args_only_at_the_proxy() {
        let mut state = GenesisState::new();
        let desc = predeploy(L2_CROSS_DOMAIN_MESSENGER).unwrap();
        let spec = desc.initializer.as_ref().unwrap();
        initialize_predeploy(&mut state, desc, spec, &registry()).unwrap();

        let implementation = to_namespace(desc.address).unwrap();
        // Implementation: flag set, neutral args leave no entries
        assert_eq!(state.storage(implementation, INITIALIZED_FLAG_SLOT), INITIALIZED);
        assert_eq!(state.storage(implementation, SLOT_1), B256::ZERO);
        // Proxy: flag set, real L1 counterpart recorded
        assert_eq!(state.storage(desc.address, INITIALIZED_FLAG_SLOT), INITIALIZED);
        assert_eq!(
            state.storage(desc.address, SLOT_1),
            address!("00000000000000000000000000000000000000c1").into_word()
        );
    }

    #[test]
    fn test_local_predeploy_argument_needs_no_registry() {
        let mut state = GenesisState::new();
        let desc = predeploy(MINTABLE_ERC20_FACTORY).unwrap();
        let spec = desc.initializer.as_ref().unwrap();
        // Empty registry: the factory's argument is a local predeploy
        initialize_predeploy(&mut state, desc, spec, &AddressRegistry::new()).unwrap();
        assert_eq!(
            state.storage(desc.address, SLOT_1),
            crate::predeploys::L2_STANDARD_BRIDGE.into_word()
        );
    }

    #[test]
    fn test_missing_registry_name_fails_before_any_write() {
        let mut state = GenesisState::new();
        let desc = predeploy(L2_CROSS_DOMAIN_MESSENGER).unwrap();
        let spec = desc.initializer.as_ref().unwrap();
        let err =
            initialize_predeploy(&mut state, desc, spec, &AddressRegistry::new()).unwrap_err();
        assert!(matches!(err, GenesisBuildError::MissingL1Contract { .. }));
        assert!(state.is_empty(), "failed resolution must not touch state");
    }

    #[test]
    fn test_reinvocation_fails_at_both_addresses_after_the_protocol() {
        let mut state = GenesisState::new();
        let desc = predeploy(L2_CROSS_DOMAIN_MESSENGER).unwrap();
        let spec = desc.initializer.as_ref().unwrap();
        initialize_predeploy(&mut state, desc, spec, &registry()).unwrap();

        for target in [to_namespace(desc.address).unwrap(), desc.address] {
            assert!(matches!(
                invoke_initializer(&mut state, target, &[]),
                Err(GenesisBuildError::AlreadyInitialized { .. })
            ));
        }
    }
}
