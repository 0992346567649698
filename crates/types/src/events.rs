//! Records emitted by curve operations

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount_serde::decimal_u128;

/// Event emitted when units are bought from the curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensPurchased {
    pub buyer: Address,
    #[serde(with = "decimal_u128")]
    pub amount: u128,
    #[serde(with = "decimal_u128")]
    pub cost: u128,
}

/// Event emitted when units are sold back to the curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensSold {
    pub seller: Address,
    #[serde(with = "decimal_u128")]
    pub amount: u128,
    #[serde(with = "decimal_u128")]
    pub refund: u128,
}

/// Event emitted once liquidity has been seeded in the venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveFinalized {
    pub position_id: u64,
    #[serde(with = "decimal_u128")]
    pub net_raised: u128,
    #[serde(with = "decimal_u128")]
    pub amount0: u128,
    #[serde(with = "decimal_u128")]
    pub amount1: u128,
    #[serde(with = "decimal_u128")]
    pub liquidity: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStage {
    PreDeposit,
    PostDeposit,
}

/// Diagnostic view of the curve's balances around the deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquiditySnapshot {
    pub stage: SnapshotStage,
    #[serde(with = "decimal_u128")]
    pub native_balance: u128,
    #[serde(with = "decimal_u128")]
    pub asset_balance: u128,
    #[serde(with = "decimal_u128")]
    pub wrapped_balance: u128,
    #[serde(with = "decimal_u128")]
    pub asset_total_supply: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveEvent {
    Buy(TokensPurchased),
    Sell(TokensSold),
    Finalized(CurveFinalized),
    LiquiditySnapshot(LiquiditySnapshot),
}

impl From<TokensPurchased> for CurveEvent {
    fn from(event: TokensPurchased) -> Self {
        CurveEvent::Buy(event)
    }
}

impl From<TokensSold> for CurveEvent {
    fn from(event: TokensSold) -> Self {
        CurveEvent::Sell(event)
    }
}

impl From<CurveFinalized> for CurveEvent {
    fn from(event: CurveFinalized) -> Self {
        CurveEvent::Finalized(event)
    }
}

impl From<LiquiditySnapshot> for CurveEvent {
    fn from(event: LiquiditySnapshot) -> Self {
        CurveEvent::LiquiditySnapshot(event)
    }
}
