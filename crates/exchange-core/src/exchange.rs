//! The exchange ledger engine.
//!
//! [`Exchange`] owns every balance and every order behind one mutation
//! gate. Each operation is atomic: it validates everything it is about
//! to do against a staged view of the ledger, and only then writes, so
//! no caller ever observes a partially applied trade. On success each
//! operation returns the single event it committed; on failure nothing
//! changed and nothing is emitted.

use std::collections::{BTreeMap, HashMap};

use crate::asset::{AccountId, Amount, AssetId};
use crate::error::ExchangeError;
use crate::events::{CancelEvent, DepositEvent, OrderEvent, TradeEvent, WithdrawEvent};
use crate::order::{Order, OrderId, OrderStatus};
use crate::token::TokenLedger;

/// Scratch view of balances an operation intends to write.
type StagedBalances = HashMap<(AssetId, AccountId), Amount>;

/// Custodial account book plus central order book.
#[derive(Debug)]
pub struct Exchange {
    /// Account credited with the taker fee of every trade.
    fee_account: AccountId,

    /// Taker fee in whole percent, fixed at construction.
    fee_percent: u64,

    /// (asset, account) -> balance. Absent entry == zero; entries are
    /// unsigned and every debit is checked, so no balance goes negative.
    balances: HashMap<(AssetId, AccountId), Amount>,

    /// Orders by id, kept forever; fills and cancels only flip status.
    orders: BTreeMap<OrderId, Order>,

    /// Number of orders ever created; also the last assigned id.
    order_count: u64,
}

impl Exchange {
    /// Create an empty exchange charging `fee_percent` percent on each
    /// fill, credited to `fee_account`.
    pub fn new(fee_account: AccountId, fee_percent: u64) -> Self {
        Exchange {
            fee_account,
            fee_percent,
            balances: HashMap::new(),
            orders: BTreeMap::new(),
            order_count: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Deposits and withdrawals
    // -------------------------------------------------------------------------

    /// Credit native value that arrived with the call.
    ///
    /// The hosting platform has already moved the value into the
    /// exchange's custody; the ledger only records it.
    pub fn deposit_native(
        &mut self,
        caller: AccountId,
        amount: Amount,
    ) -> Result<DepositEvent, ExchangeError> {
        let balance = self.credit(AssetId::NATIVE, caller, amount)?;
        Ok(DepositEvent {
            asset: AssetId::NATIVE,
            user: caller,
            amount,
            balance,
        })
    }

    /// Deposit a non-native token, pulling `amount` from the caller's
    /// external holding into exchange custody.
    ///
    /// Requires a prior allowance on the token ledger. If the pull
    /// fails, no ledger entry changes.
    pub fn deposit_token(
        &mut self,
        tokens: &mut dyn TokenLedger,
        caller: AccountId,
        asset: AssetId,
        amount: Amount,
    ) -> Result<DepositEvent, ExchangeError> {
        if asset.is_native() {
            return Err(ExchangeError::InvalidAsset);
        }

        // The credit must be known to fit before custody moves.
        let balance = self
            .balance_of(asset, caller)
            .checked_add(amount)
            .ok_or(ExchangeError::Overflow)?;

        tokens.pull(asset, caller, amount)?;
        self.balances.insert((asset, caller), balance);

        Ok(DepositEvent {
            asset,
            user: caller,
            amount,
            balance,
        })
    }

    /// Withdraw native value back to the caller.
    ///
    /// The ledger debit is the commit point; the hosting platform
    /// performs the actual value transfer out of custody.
    pub fn withdraw_native(
        &mut self,
        caller: AccountId,
        amount: Amount,
    ) -> Result<WithdrawEvent, ExchangeError> {
        let balance = self.debit(AssetId::NATIVE, caller, amount)?;
        Ok(WithdrawEvent {
            asset: AssetId::NATIVE,
            user: caller,
            amount,
            balance,
        })
    }

    /// Withdraw a non-native token, pushing `amount` out of exchange
    /// custody back to the caller's external holding.
    ///
    /// The balance debit and the outbound transfer commit together or
    /// not at all.
    pub fn withdraw_token(
        &mut self,
        tokens: &mut dyn TokenLedger,
        caller: AccountId,
        asset: AssetId,
        amount: Amount,
    ) -> Result<WithdrawEvent, ExchangeError> {
        if asset.is_native() {
            return Err(ExchangeError::InvalidAsset);
        }

        let available = self.balance_of(asset, caller);
        if available < amount {
            return Err(ExchangeError::InsufficientFunds {
                asset,
                account: caller,
                needed: amount,
                available,
            });
        }

        tokens.push(asset, caller, amount)?;
        let balance = available - amount;
        self.balances.insert((asset, caller), balance);

        Ok(WithdrawEvent {
            asset,
            user: caller,
            amount,
            balance,
        })
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Place an order: the caller wants `amount_wanted` of
    /// `asset_wanted` in exchange for `amount_offered` of
    /// `asset_offered`.
    ///
    /// No funds are required or reserved here; the offered balance is
    /// only checked when the order fills. Speculative orders simply
    /// fail to fill later.
    pub fn make_order(
        &mut self,
        caller: AccountId,
        asset_wanted: AssetId,
        amount_wanted: Amount,
        asset_offered: AssetId,
        amount_offered: Amount,
    ) -> Result<OrderEvent, ExchangeError> {
        let next = self
            .order_count
            .checked_add(1)
            .ok_or(ExchangeError::Overflow)?;
        let id = OrderId(next);
        let timestamp = Order::current_timestamp();

        self.orders.insert(
            id,
            Order {
                id,
                creator: caller,
                asset_wanted,
                amount_wanted,
                asset_offered,
                amount_offered,
                timestamp,
                status: OrderStatus::Open,
            },
        );
        self.order_count = next;

        Ok(OrderEvent {
            id,
            user: caller,
            asset_wanted,
            amount_wanted,
            asset_offered,
            amount_offered,
            timestamp,
        })
    }

    /// Fill an open order in full.
    ///
    /// The taker pays `amount_wanted` plus the fee in `asset_wanted`;
    /// the creator receives `amount_wanted` exactly and gives up
    /// `amount_offered`, which the taker receives in full. The fee,
    /// `amount_wanted * fee_percent / 100` rounded down, goes to the
    /// fee account. All five balance legs land together or not at all.
    ///
    /// A creator may fill their own order; the legs then net out to
    /// paying the fee.
    pub fn fill_order(&mut self, taker: AccountId, id: OrderId) -> Result<TradeEvent, ExchangeError> {
        let order = match self.orders.get(&id) {
            Some(order) => order,
            None => return Err(ExchangeError::NotFound { id }),
        };
        if order.status.is_final() {
            return Err(ExchangeError::AlreadyFinal { id });
        }
        let order = order.clone();

        let fee = order
            .amount_wanted
            .checked_mul(self.fee_percent as Amount)
            .ok_or(ExchangeError::Overflow)?
            / 100;
        let taker_pays = order
            .amount_wanted
            .checked_add(fee)
            .ok_or(ExchangeError::Overflow)?;

        // Stage every leg against a scratch view; the live ledger is
        // untouched until all five are known to succeed. Sequential
        // staging also keeps self-fills and fee-account overlaps exact.
        let mut staged = StagedBalances::new();
        self.stage_debit(&mut staged, order.asset_wanted, taker, taker_pays)?;
        self.stage_credit(&mut staged, order.asset_wanted, order.creator, order.amount_wanted)?;
        self.stage_credit(&mut staged, order.asset_wanted, self.fee_account, fee)?;
        self.stage_debit(&mut staged, order.asset_offered, order.creator, order.amount_offered)?;
        self.stage_credit(&mut staged, order.asset_offered, taker, order.amount_offered)?;

        for (key, balance) in staged {
            self.balances.insert(key, balance);
        }
        if let Some(stored) = self.orders.get_mut(&id) {
            stored.status = OrderStatus::Filled;
        }

        Ok(TradeEvent {
            id,
            creator: order.creator,
            asset_wanted: order.asset_wanted,
            amount_wanted: order.amount_wanted,
            asset_offered: order.asset_offered,
            amount_offered: order.amount_offered,
            taker,
            timestamp: Order::current_timestamp(),
        })
    }

    /// Cancel an open order. Only the creator may cancel, and only
    /// while the order is still open. No balances move.
    pub fn cancel_order(
        &mut self,
        caller: AccountId,
        id: OrderId,
    ) -> Result<CancelEvent, ExchangeError> {
        let order = match self.orders.get_mut(&id) {
            Some(order) => order,
            None => return Err(ExchangeError::NotFound { id }),
        };
        if order.creator != caller {
            return Err(ExchangeError::Unauthorized { id, caller });
        }
        if order.status.is_final() {
            return Err(ExchangeError::AlreadyFinal { id });
        }

        order.status = OrderStatus::Cancelled;

        Ok(CancelEvent {
            id,
            user: order.creator,
            asset_wanted: order.asset_wanted,
            amount_wanted: order.amount_wanted,
            asset_offered: order.asset_offered,
            amount_offered: order.amount_offered,
            timestamp: Order::current_timestamp(),
        })
    }

    // -------------------------------------------------------------------------
    // Read-only queries (no events)
    // -------------------------------------------------------------------------

    /// Account credited with trade fees.
    pub fn fee_account(&self) -> AccountId {
        self.fee_account
    }

    /// Taker fee in whole percent.
    pub fn fee_percent(&self) -> u64 {
        self.fee_percent
    }

    /// Balance of `user` in `asset`. Unknown pairs are zero.
    pub fn balance_of(&self, asset: AssetId, user: AccountId) -> Amount {
        self.balances.get(&(asset, user)).copied().unwrap_or(0)
    }

    /// Number of orders ever created.
    pub fn order_count(&self) -> u64 {
        self.order_count
    }

    /// Look up an order by id, whatever its state.
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Whether `id` names a filled order. Unknown ids are `false`.
    pub fn order_filled(&self, id: OrderId) -> bool {
        matches!(self.orders.get(&id), Some(order) if order.status == OrderStatus::Filled)
    }

    /// Whether `id` names a cancelled order. Unknown ids are `false`.
    pub fn order_cancelled(&self, id: OrderId) -> bool {
        matches!(self.orders.get(&id), Some(order) if order.status == OrderStatus::Cancelled)
    }

    /// Orders still open, in creation order. Observers partition these
    /// into buy/sell views themselves by comparing the asset pair
    /// against the native sentinel.
    pub fn open_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders
            .values()
            .filter(|order| order.status == OrderStatus::Open)
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    /// Credit directly on the live ledger (single-leg operations).
    /// Returns the new balance.
    fn credit(
        &mut self,
        asset: AssetId,
        account: AccountId,
        amount: Amount,
    ) -> Result<Amount, ExchangeError> {
        let balance = self
            .balance_of(asset, account)
            .checked_add(amount)
            .ok_or(ExchangeError::Overflow)?;
        self.balances.insert((asset, account), balance);
        Ok(balance)
    }

    /// Debit directly on the live ledger (single-leg operations).
    /// Returns the new balance.
    fn debit(
        &mut self,
        asset: AssetId,
        account: AccountId,
        amount: Amount,
    ) -> Result<Amount, ExchangeError> {
        let available = self.balance_of(asset, account);
        if available < amount {
            return Err(ExchangeError::InsufficientFunds {
                asset,
                account,
                needed: amount,
                available,
            });
        }
        let balance = available - amount;
        self.balances.insert((asset, account), balance);
        Ok(balance)
    }

    /// Balance as seen through the scratch view: staged writes shadow
    /// the live ledger.
    fn staged_balance(&self, staged: &StagedBalances, asset: AssetId, account: AccountId) -> Amount {
        staged
            .get(&(asset, account))
            .copied()
            .unwrap_or_else(|| self.balance_of(asset, account))
    }

    fn stage_debit(
        &self,
        staged: &mut StagedBalances,
        asset: AssetId,
        account: AccountId,
        amount: Amount,
    ) -> Result<(), ExchangeError> {
        let available = self.staged_balance(staged, asset, account);
        if available < amount {
            return Err(ExchangeError::InsufficientFunds {
                asset,
                account,
                needed: amount,
                available,
            });
        }
        staged.insert((asset, account), available - amount);
        Ok(())
    }

    fn stage_credit(
        &self,
        staged: &mut StagedBalances,
        asset: AssetId,
        account: AccountId,
        amount: Amount,
    ) -> Result<(), ExchangeError> {
        let balance = self
            .staged_balance(staged, asset, account)
            .checked_add(amount)
            .ok_or(ExchangeError::Overflow)?;
        staged.insert((asset, account), balance);
        Ok(())
    }
}
