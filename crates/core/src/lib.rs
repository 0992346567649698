//! # Ascent Core - Bonding Curve Logic
//!
//! This crate contains the curve itself and the interfaces it drives:
//!
//! - `pricing`: closed-form exponential buy and sell quotes
//! - `curve`: the buy/sell state machine with its single-flight guard
//! - `migration`: the one-shot move of the raised value into a venue pool
//! - `host`: traits for the bank, asset ledger, wrapped native and venue
//!
//! Collaborators are reached through a `CurveHost` passed into each
//! operation. The host must be able to snapshot and revert its state, which
//! is how a failed operation discards every transfer it made.

pub mod curve;
pub mod host;
pub mod migration;
pub mod pricing;
pub mod reentrancy;

// Re-export commonly used items
pub use curve::BondingCurve;
pub use host::*;
pub use migration::LiquidityMigrator;
pub use pricing::CurvePricing;
pub use reentrancy::{ReentrancyGuard, ReentrancyStatus, ScopedReentrancyGuard};

pub use ascent_types::{CurveError, CurveResult};
