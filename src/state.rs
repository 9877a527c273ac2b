//! In-memory genesis ledger.
//!
//! The build pass owns a single [`GenesisState`] and mutates it directly;
//! there is no virtual machine behind it. Accounts and storage live in
//! `BTreeMap`s, so address and slot ordering is structural and the
//! serializer never has to sort.

use alloy_primitives::{Address, Bytes, B256, U256};
use std::collections::BTreeMap;

/// One account record: code, storage, balance, nonce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    /// Balance in the smallest unit
    pub balance: U256,
    /// Account nonce
    pub nonce: u64,
    /// Runtime bytecode; empty for balance-only accounts
    pub code: Bytes,
    /// Storage words keyed by slot
    pub storage: BTreeMap<B256, B256>,
}

impl Account {
    /// Whether the record carries no state at all.
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero() && self.nonce == 0 && self.code.is_empty() && self.storage.is_empty()
    }
}

/// The ledger under construction: a mapping from address to account.
///
/// Storage writes follow EVM semantics: writing a zero word clears the
/// slot, so zero-valued entries never exist and canonical output is free
/// of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenesisState {
    accounts: BTreeMap<Address, Account>,
}

impl GenesisState {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `addr`, zero for absent accounts.
    pub fn balance(&self, addr: Address) -> U256 {
        self.accounts.get(&addr).map(|a| a.balance).unwrap_or_default()
    }

    /// Credits `amount` to `addr`, creating the account if needed.
    pub fn add_balance(&mut self, addr: Address, amount: U256) {
        let account = self.accounts.entry(addr).or_default();
        account.balance += amount;
    }

    /// Nonce of `addr`, zero for absent accounts.
    pub fn nonce(&self, addr: Address) -> u64 {
        self.accounts.get(&addr).map(|a| a.nonce).unwrap_or_default()
    }

    /// Sets the nonce of `addr`, creating the account if needed.
    pub fn set_nonce(&mut self, addr: Address, nonce: u64) {
        self.accounts.entry(addr).or_default().nonce = nonce;
    }

    /// Runtime code of `addr`; empty for absent or code-less accounts.
    pub fn code(&self, addr: Address) -> Bytes {
        self.accounts.get(&addr).map(|a| a.code.clone()).unwrap_or_default()
    }

    /// Installs runtime code at `addr`, creating the account if needed.
    pub fn set_code(&mut self, addr: Address, code: Bytes) {
        self.accounts.entry(addr).or_default().code = code;
    }

    /// Storage word at `slot` of `addr`; zero when unset.
    pub fn storage(&self, addr: Address, slot: B256) -> B256 {
        self.accounts
            .get(&addr)
            .and_then(|a| a.storage.get(&slot).copied())
            .unwrap_or_default()
    }

    /// Writes a storage word. A zero word clears the slot instead of
    /// recording an explicit zero entry.
    pub fn set_storage(&mut self, addr: Address, slot: B256, word: B256) {
        if word.is_zero() {
            if let Some(account) = self.accounts.get_mut(&addr) {
                account.storage.remove(&slot);
            }
            return;
        }
        self.accounts.entry(addr).or_default().storage.insert(slot, word);
    }

    /// Drops the account record for `addr` entirely. Used to destroy
    /// scratch accounts before serialization.
    pub fn erase(&mut self, addr: Address) {
        self.accounts.remove(&addr);
    }

    /// Whether `addr` has an account record.
    pub fn contains(&self, addr: Address) -> bool {
        self.accounts.contains_key(&addr)
    }

    /// Number of account records.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the ledger holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Accounts in ascending address order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }
}
