//! External token custody.
//!
//! Non-native assets live on an external token ledger. Depositing one
//! pulls units from the depositor's token holding into exchange custody
//! (gated by a prior allowance granted to the exchange); withdrawing
//! pushes them back out. [`TokenLedger`] is the seam the hosting
//! platform implements against its real token accounts;
//! [`InMemoryTokenLedger`] is the reference implementation used by the
//! service crate, tests, and demos.

use std::collections::HashMap;

use crate::asset::{AccountId, Amount, AssetId};

/// Failure classes for token-ledger transfers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The sender does not hold enough of the asset.
    #[error("insufficient token balance")]
    InsufficientBalance,

    /// The exchange was not approved for (enough of) the transfer.
    #[error("insufficient allowance for the exchange")]
    InsufficientAllowance,

    /// Checked arithmetic failed on a token balance.
    #[error("token balance overflow")]
    Overflow,
}

/// Custody-transfer seam between the exchange and an external token
/// ledger.
///
/// Both methods are transactional from the exchange's point of view:
/// either the full amount moves and `Ok(())` is returned, or nothing
/// moved at all.
pub trait TokenLedger {
    /// Pull `amount` of `asset` out of `owner`'s holding into exchange
    /// custody. Requires `owner` to have approved the exchange for at
    /// least `amount`; the allowance is consumed by the transfer.
    fn pull(&mut self, asset: AssetId, owner: AccountId, amount: Amount) -> Result<(), TokenError>;

    /// Push `amount` of `asset` out of exchange custody into
    /// `recipient`'s holding.
    fn push(
        &mut self,
        asset: AssetId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError>;
}

/// In-memory token ledger with per-asset balances, exchange allowances,
/// and a custody pool.
///
/// Reconstructs the observable behavior of a standard fungible-token
/// account book: transfers reject insufficient balances, approvals are
/// overwritable, and allowance-gated pulls consume the allowance.
#[derive(Debug, Default)]
pub struct InMemoryTokenLedger {
    /// (asset, holder) -> balance. Absent entry == zero.
    balances: HashMap<(AssetId, AccountId), Amount>,

    /// (asset, owner) -> amount the owner has approved the exchange to
    /// pull. Absent entry == zero.
    allowances: HashMap<(AssetId, AccountId), Amount>,

    /// asset -> units currently held in exchange custody.
    custody: HashMap<AssetId, Amount>,
}

impl InMemoryTokenLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        InMemoryTokenLedger::default()
    }

    /// Issue `amount` new units of `asset` to `account`.
    pub fn mint(
        &mut self,
        asset: AssetId,
        account: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let entry = self.balances.entry((asset, account)).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(TokenError::Overflow)?;
        Ok(())
    }

    /// Move `amount` of `asset` from `sender` to `recipient`.
    pub fn transfer(
        &mut self,
        asset: AssetId,
        sender: AccountId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let from = self.balance_of(asset, sender);
        if from < amount {
            return Err(TokenError::InsufficientBalance);
        }
        let to = self.balance_of(asset, recipient);
        let to_after = to.checked_add(amount).ok_or(TokenError::Overflow)?;

        self.balances.insert((asset, sender), from - amount);
        self.balances.insert((asset, recipient), to_after);
        Ok(())
    }

    /// Approve the exchange to pull up to `amount` of `asset` from
    /// `owner`. Replaces any previous approval.
    pub fn approve(&mut self, asset: AssetId, owner: AccountId, amount: Amount) {
        self.allowances.insert((asset, owner), amount);
    }

    /// Current holding of `account` in `asset`.
    pub fn balance_of(&self, asset: AssetId, account: AccountId) -> Amount {
        self.balances.get(&(asset, account)).copied().unwrap_or(0)
    }

    /// Remaining amount the exchange may pull from `owner` in `asset`.
    pub fn allowance(&self, asset: AssetId, owner: AccountId) -> Amount {
        self.allowances.get(&(asset, owner)).copied().unwrap_or(0)
    }

    /// Units of `asset` currently held in exchange custody.
    pub fn custody_of(&self, asset: AssetId) -> Amount {
        self.custody.get(&asset).copied().unwrap_or(0)
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn pull(&mut self, asset: AssetId, owner: AccountId, amount: Amount) -> Result<(), TokenError> {
        let balance = self.balance_of(asset, owner);
        if balance < amount {
            return Err(TokenError::InsufficientBalance);
        }
        let allowed = self.allowance(asset, owner);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance);
        }
        let held = self.custody_of(asset);
        let held_after = held.checked_add(amount).ok_or(TokenError::Overflow)?;

        self.balances.insert((asset, owner), balance - amount);
        self.allowances.insert((asset, owner), allowed - amount);
        self.custody.insert(asset, held_after);
        Ok(())
    }

    fn push(
        &mut self,
        asset: AssetId,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let held = self.custody_of(asset);
        if held < amount {
            return Err(TokenError::InsufficientBalance);
        }
        let to = self.balance_of(asset, recipient);
        let to_after = to.checked_add(amount).ok_or(TokenError::Overflow)?;

        self.custody.insert(asset, held - amount);
        self.balances.insert((asset, recipient), to_after);
        Ok(())
    }
}
