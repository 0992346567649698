use std::fs;
use std::path::Path;

use ascent_types::amount_serde::decimal_u128;
use ascent_types::{Address, CurveConfig, FeeTier, DEFAULT_LEDGER_DECIMALS, MAX_LEDGER_DECIMALS, WAD};
use serde::{Deserialize, Serialize};

use crate::{SimulationError, SimulationResult};

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Curve under test
    pub curve: CurveConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    pub scenario: ScenarioConfig,
}

/// Asset ledger parameters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Base units per whole unit, as a power of ten
    pub decimals: u8,
}

/// Trading scenario driven against the curve
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScenarioConfig {
    /// Number of funded trading accounts
    pub buyers: usize,

    /// Native balance credited to each account
    #[serde(with = "decimal_u128")]
    pub starting_balance: u128,

    /// Random buy/sell rounds before the cap run
    pub random_rounds: usize,

    /// Largest trade in whole units during the random rounds
    #[serde(with = "decimal_u128")]
    pub max_trade: u128,

    /// Whole units per buy while driving the curve to its cap
    #[serde(with = "decimal_u128")]
    pub lot_size: u128,

    pub seed: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_LEDGER_DECIMALS,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            curve: CurveConfig::new(
                4_900_000_000,
                1_000_000_003_180_000_000,
                6 * WAD,
                Address::from_low_u64(0xfee),
            )
            .with_fee_tier(FeeTier::Medium)
            .with_protocol_fee_percent(WAD / 20),
            ledger: LedgerConfig::default(),
            scenario: ScenarioConfig {
                buyers: 8,
                starting_balance: 100 * WAD,
                random_rounds: 40,
                max_trade: 10_000_000,
                lot_size: 50_000_000,
                seed: 7,
            },
        }
    }
}

impl SimulationConfig {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> SimulationResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SimulationError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: SimulationConfig = toml::from_str(&content).map_err(|e| {
            SimulationError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> SimulationResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| SimulationError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|e| {
            SimulationError::Config(format!("Failed to write config file {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SimulationResult<()> {
        self.curve.validate()?;

        if self.ledger.decimals > MAX_LEDGER_DECIMALS {
            return Err(SimulationError::Config(format!(
                "ledger.decimals {} exceeds {}",
                self.ledger.decimals, MAX_LEDGER_DECIMALS
            )));
        }

        let scenario = &self.scenario;
        if scenario.buyers == 0 {
            return Err(SimulationError::Config("scenario.buyers must be at least 1".to_string()));
        }

        if scenario.starting_balance == 0 {
            return Err(SimulationError::Config(
                "scenario.starting_balance must be positive".to_string(),
            ));
        }

        if scenario.lot_size == 0 {
            return Err(SimulationError::Config("scenario.lot_size must be positive".to_string()));
        }

        if scenario.random_rounds > 0 && scenario.max_trade == 0 {
            return Err(SimulationError::Config(
                "scenario.max_trade must be positive when random rounds are enabled".to_string(),
            ));
        }

        Ok(())
    }
}
