//! Scenarios against the in-memory token custody ledger.
//!
//! These cover the external-token side on its own: holdings, direct
//! transfers, approvals, and the allowance-gated custody pull the
//! exchange relies on for deposits.

use exchange_core::{units, AccountId, AssetId, InMemoryTokenLedger, TokenError, TokenLedger};

const TOKEN: AssetId = AssetId(7);
const ALICE: AccountId = AccountId(1);
const BOB: AccountId = AccountId(2);

fn setup() -> InMemoryTokenLedger {
    let mut tokens = InMemoryTokenLedger::new();
    tokens.mint(TOKEN, ALICE, units(100)).unwrap();
    tokens
}

#[test]
fn mint_credits_the_recipient() {
    let tokens = setup();
    assert_eq!(tokens.balance_of(TOKEN, ALICE), units(100));
    assert_eq!(tokens.balance_of(TOKEN, BOB), 0);
}

#[test]
fn transfer_moves_funds_between_holders() {
    let mut tokens = setup();

    tokens.transfer(TOKEN, ALICE, BOB, units(40)).unwrap();

    assert_eq!(tokens.balance_of(TOKEN, ALICE), units(60));
    assert_eq!(tokens.balance_of(TOKEN, BOB), units(40));
}

#[test]
fn transfer_rejects_insufficient_balance() {
    let mut tokens = setup();

    let err = tokens.transfer(TOKEN, BOB, ALICE, units(1)).unwrap_err();

    assert_eq!(err, TokenError::InsufficientBalance);
    assert_eq!(tokens.balance_of(TOKEN, ALICE), units(100));
}

#[test]
fn approve_sets_and_replaces_the_exchange_allowance() {
    let mut tokens = setup();

    tokens.approve(TOKEN, ALICE, units(10));
    assert_eq!(tokens.allowance(TOKEN, ALICE), units(10));

    // A later approval replaces the earlier one, it does not add.
    tokens.approve(TOKEN, ALICE, units(3));
    assert_eq!(tokens.allowance(TOKEN, ALICE), units(3));
}

#[test]
fn pull_consumes_the_allowance() {
    let mut tokens = setup();
    tokens.approve(TOKEN, ALICE, units(10));

    tokens.pull(TOKEN, ALICE, units(4)).unwrap();

    assert_eq!(tokens.balance_of(TOKEN, ALICE), units(96));
    assert_eq!(tokens.allowance(TOKEN, ALICE), units(6));
    assert_eq!(tokens.custody_of(TOKEN), units(4));
}

#[test]
fn pull_rejects_more_than_the_allowance() {
    let mut tokens = setup();
    tokens.approve(TOKEN, ALICE, units(2));

    let err = tokens.pull(TOKEN, ALICE, units(5)).unwrap_err();

    assert_eq!(err, TokenError::InsufficientAllowance);
    assert_eq!(tokens.balance_of(TOKEN, ALICE), units(100));
    assert_eq!(tokens.custody_of(TOKEN), 0);
}

#[test]
fn pull_rejects_more_than_the_holding() {
    let mut tokens = setup();
    tokens.approve(TOKEN, BOB, units(10));

    let err = tokens.pull(TOKEN, BOB, units(10)).unwrap_err();

    assert_eq!(err, TokenError::InsufficientBalance);
}

#[test]
fn push_returns_custody_to_a_holder() {
    let mut tokens = setup();
    tokens.approve(TOKEN, ALICE, units(10));
    tokens.pull(TOKEN, ALICE, units(10)).unwrap();

    tokens.push(TOKEN, ALICE, units(10)).unwrap();

    assert_eq!(tokens.balance_of(TOKEN, ALICE), units(100));
    assert_eq!(tokens.custody_of(TOKEN), 0);
}

#[test]
fn push_rejects_more_than_custody_holds() {
    let mut tokens = setup();

    let err = tokens.push(TOKEN, ALICE, units(1)).unwrap_err();

    assert_eq!(err, TokenError::InsufficientBalance);
}
