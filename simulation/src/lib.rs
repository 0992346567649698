/// Simulation framework for the Ascent bonding curve
///
/// Provides utilities for:
/// - Hosting curves on an in-memory chain with checkpoint/revert
/// - Reference bank, asset ledger, wrapped native and venue implementations
/// - TOML-configured trading scenarios with JSON reports

pub mod bank;
pub mod chain;
pub mod config;
pub mod scenario_runner;
pub mod token;
pub mod venue;

pub use bank::{NativeBalances, ReceiveHook};
pub use chain::{ChainLayout, InMemoryChain};
pub use config::{LedgerConfig, ScenarioConfig, SimulationConfig};
pub use scenario_runner::{ScenarioReport, ScenarioRunner, TradeKind, TradeRecord};
pub use token::{Erc20Ledger, TokenBook, WrappedNativeToken};
pub use venue::{InMemoryVenue, PoolState, Position, VenueFaults};

use ascent_types::CurveError;

/// Simulation error type
#[derive(thiserror::Error, Debug)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    /// Every account is out of funds before the curve finalized
    #[error("Scenario stalled after {trades} trades: {reason}")]
    Stalled { trades: usize, reason: String },

    #[error("Report error: {0}")]
    Report(String),
}

/// Simulation result type
pub type SimulationResult<T> = std::result::Result<T, SimulationError>;
