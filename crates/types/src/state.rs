/// Mutable curve state and its terminal migration record

use ascent_math::U256;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount_serde::{decimal_u128, decimal_u256};

/// Lifecycle phase of a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurvePhase {
    /// Accepting buys and sells
    Active,
    /// Liquidity migrated; terminal
    Finalized,
}

/// State owned by one curve. Created zeroed, never deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveState {
    /// Whole units outstanding through the curve
    #[serde(with = "decimal_u128")]
    pub circulating_supply: u128,

    /// Cumulative native value collected by buys
    #[serde(with = "decimal_u128")]
    pub net_raised: u128,

    pub finalized: bool,

    /// Outcome of finalization, present once `finalized` is set
    pub migration: Option<MigrationRecord>,
}

impl CurveState {
    pub fn phase(&self) -> CurvePhase {
        if self.finalized {
            CurvePhase::Finalized
        } else {
            CurvePhase::Active
        }
    }
}

/// Where the curve's value ended up after finalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub pool: Address,
    pub token0: Address,
    pub token1: Address,

    /// Initial pool price, Q64.96 sqrt form
    #[serde(with = "decimal_u256")]
    pub sqrt_price_x96: U256,

    pub position_id: u64,

    #[serde(with = "decimal_u128")]
    pub liquidity: u128,

    #[serde(with = "decimal_u128")]
    pub amount0: u128,

    #[serde(with = "decimal_u128")]
    pub amount1: u128,

    /// Native value paid to the fee recipient before the deposit
    #[serde(with = "decimal_u128")]
    pub protocol_fee: u128,

    /// Asset base units minted to reach the target supply
    #[serde(with = "decimal_u128")]
    pub supply_minted: u128,

    /// Asset base units burned after the deposit
    #[serde(with = "decimal_u128")]
    pub asset_dust_burned: u128,

    /// Wrapped native unwrapped and sent to the fee recipient after the deposit
    #[serde(with = "decimal_u128")]
    pub native_dust_returned: u128,
}
