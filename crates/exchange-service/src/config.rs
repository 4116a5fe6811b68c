//! Configuration for the exchange service.
//!
//! Defaults can be overridden via environment variables:
//!
//! - `EXCHANGE_FEE_ACCOUNT` (default: "0")
//! - `EXCHANGE_FEE_PERCENT` (default: "10")

use std::env;
use std::str::FromStr;

use exchange_core::AccountId;

/// Service configuration.
///
/// Both values are fixed for the lifetime of the engine; there is no
/// operation that mutates them after spawn.
#[derive(Debug, Clone)]
pub struct Config {
    /// Account credited with the taker fee of every trade.
    pub fee_account: AccountId,

    /// Taker fee in whole percent.
    pub fee_percent: u64,
}

impl Config {
    /// Construct a `Config` directly, for tests and embedding.
    pub fn new(fee_account: AccountId, fee_percent: u64) -> Self {
        Config {
            fee_account,
            fee_percent,
        }
    }

    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let fee_account = AccountId(read_env_or_default("EXCHANGE_FEE_ACCOUNT", 0u64)?);
        let fee_percent = read_env_or_default("EXCHANGE_FEE_PERCENT", 10u64)?;

        Ok(Config {
            fee_account,
            fee_percent,
        })
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    T: FromStr,
    T::Err: std::error::Error + 'static,
{
    match env::var(key) {
        Ok(val) => Ok(val.parse::<T>()?),
        Err(_) => Ok(default),
    }
}
