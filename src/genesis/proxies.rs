//! Proxy installation across the predeploy window.
//!
//! Every window address (minus the exclusion set) receives the same
//! EIP-1967 forwarding shell. The shell delegates all calls to the
//! implementation address stored at the EIP-1967 implementation slot;
//! upgrades go through the proxy admin recorded at the admin slot.

use crate::errors::GenesisBuildError;
use crate::predeploys::{
    is_defined_predeploy, not_proxied, to_namespace, window_address, EIP1967_ADMIN_SLOT,
    EIP1967_IMPLEMENTATION_SLOT, PREDEPLOY_COUNT, PROXY_ADMIN,
};
use crate::state::GenesisState;
use alloy_primitives::{bytes, Bytes};

/// Runtime bytecode of the EIP-1967 proxy shell.
///
/// Plain-value transfers (empty calldata) stop without delegating, so the
/// shell can receive fees before an implementation is pointed at it.
pub(crate) fn proxy_code() -> Bytes {
    bytes!(
        "36"             // calldatasize
        "15"             // iszero
        "60" "43"        // push1 0x43 (STOP_DEST)
        "57"             // jumpi
        "36"             // calldatasize
        "60" "00"        // push1 0x00
        "60" "00"        // push1 0x00
        "37"             // calldatacopy
        "60" "00"        // push1 0x00
        "60" "00"        // push1 0x00
        "36"             // calldatasize
        "60" "00"        // push1 0x00
        "7f"             // push32 (EIP-1967 implementation slot)
        "360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc"
        "54"             // sload
        "5a"             // gas
        "f4"             // delegatecall
        "3d"             // returndatasize
        "60" "00"        // push1 0x00
        "60" "00"        // push1 0x00
        "3e"             // returndatacopy
        "90"             // swap1
        "60" "3d"        // push1 0x3d (RETURN_DEST)
        "57"             // jumpi
        "3d"             // returndatasize
        "60" "00"        // push1 0x00
        "fd"             // revert
        "5b"             // jumpdest (RETURN_DEST = 0x3d)
        "3d"             // returndatasize
        "60" "00"        // push1 0x00
        "f3"             // return
        "5b"             // jumpdest (STOP_DEST = 0x43)
        "00"             // stop
    )
}

/// Installs the proxy shell across the whole predeploy window.
///
/// Postcondition: every window address is either in the exclusion set or
/// carries proxy code with the admin slot pointing at the proxy admin
/// predeploy; addresses with a registered descriptor additionally have
/// their implementation slot pointing at the code namespace.
///
/// Returns the number of proxies installed.
pub(crate) fn set_proxies(state: &mut GenesisState) -> Result<usize, GenesisBuildError> {
    let code = proxy_code();
    let admin = PROXY_ADMIN.into_word();
    let mut installed = 0;

    for index in 0..PREDEPLOY_COUNT {
        let addr = window_address(index);
        if not_proxied(addr) {
            continue;
        }
        state.set_code(addr, code.clone());
        state.set_nonce(addr, 1);
        state.set_storage(addr, EIP1967_ADMIN_SLOT, admin);
        if is_defined_predeploy(addr) {
            let implementation = to_namespace(addr)?;
            state.set_storage(addr, EIP1967_IMPLEMENTATION_SLOT, implementation.into_word());
        }
        installed += 1;
    }

    Ok(installed)
}
