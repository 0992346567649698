use std::fs;
use std::path::Path;

use ascent_core::BondingCurve;
use ascent_types::amount_serde::decimal_u128;
use ascent_types::{scale_to_ledger, Address, CurveEvent, CurveState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::chain::{ChainLayout, InMemoryChain};
use crate::config::SimulationConfig;
use crate::venue::PoolState;
use crate::{SimulationError, SimulationResult};

/// Address the scenario deploys its curve at
pub const CURVE_ADDRESS: Address = Address::new([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xc0, 0xff, 0xee,
]);

const TRADER_ADDRESS_BASE: u64 = 0x7ade_0000;

/// Probability that a random round sells when the trader holds units
const SELL_PROBABILITY: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeKind {
    Buy,
    Sell,
}

/// One attempted trade, successful or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeRecord {
    pub round: usize,
    pub trader: Address,
    pub kind: TradeKind,
    #[serde(with = "decimal_u128")]
    pub amount: u128,
    /// Cost charged or refund paid; zero when the trade failed
    #[serde(with = "decimal_u128")]
    pub value: u128,
    pub error: Option<String>,
}

impl TradeRecord {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub curve: Address,
    pub trades: Vec<TradeRecord>,
    pub successful_buys: usize,
    pub successful_sells: usize,
    pub failed_trades: usize,
    pub final_state: CurveState,
    pub events: Vec<CurveEvent>,
    pub pool: Option<PoolState>,
    #[serde(with = "decimal_u128")]
    pub fee_recipient_balance: u128,
    #[serde(with = "decimal_u128")]
    pub curve_native_balance: u128,
    #[serde(with = "decimal_u128")]
    pub asset_total_supply: u128,
}

impl ScenarioReport {
    pub fn to_json(&self) -> SimulationResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimulationError::Report(e.to_string()))
    }

    pub fn write(&self, path: impl AsRef<Path>) -> SimulationResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|e| {
            SimulationError::Report(format!("Failed to write report {}: {}", path.display(), e))
        })
    }
}

/// Drives one curve from launch to finalization
pub struct ScenarioRunner {
    config: SimulationConfig,
    chain: InMemoryChain,
    curve: BondingCurve,
    traders: Vec<Address>,
    unit: u128,
    rng: StdRng,
    trades: Vec<TradeRecord>,
}

impl ScenarioRunner {
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;

        let unit = scale_to_ledger(1, config.ledger.decimals)
            .ok_or_else(|| SimulationError::Config("ledger unit overflows".to_string()))?;
        let mut chain = InMemoryChain::with_layout(ChainLayout::default(), config.ledger.decimals);
        let curve = chain.launch_curve(CURVE_ADDRESS, config.curve.clone())?;

        let traders: Vec<Address> = (0..config.scenario.buyers)
            .map(|i| Address::from_low_u64(TRADER_ADDRESS_BASE + i as u64))
            .collect();
        for trader in &traders {
            chain.fund(*trader, config.scenario.starting_balance);
        }

        let rng = StdRng::seed_from_u64(config.scenario.seed);

        Ok(Self {
            config,
            chain,
            curve,
            traders,
            unit,
            rng,
            trades: Vec::new(),
        })
    }

    pub fn curve(&self) -> &BondingCurve {
        &self.curve
    }

    pub fn chain(&self) -> &InMemoryChain {
        &self.chain
    }

    pub fn traders(&self) -> &[Address] {
        &self.traders
    }

    /// Random trading, then fixed lots until the curve finalizes
    pub fn run(mut self) -> SimulationResult<ScenarioReport> {
        info!(
            "Running scenario: {} traders, {} random rounds, lots of {}",
            self.traders.len(),
            self.config.scenario.random_rounds,
            self.config.scenario.lot_size
        );

        self.run_random_rounds();
        self.run_to_cap()?;

        let report = self.report();
        info!(
            "Scenario finished: {} buys, {} sells, {} failed, net_raised={}",
            report.successful_buys,
            report.successful_sells,
            report.failed_trades,
            report.final_state.net_raised
        );
        Ok(report)
    }

    fn run_random_rounds(&mut self) {
        let max_trade = self.config.scenario.max_trade;
        for round in 0..self.config.scenario.random_rounds {
            if self.curve.is_finalized() {
                break;
            }

            let trader = self.traders[self.rng.gen_range(0..self.traders.len())];
            let held = self.units_held(trader);
            if held > 0 && self.rng.gen_bool(SELL_PROBABILITY) {
                let amount = self.rng.gen_range(1..=held.min(max_trade));
                self.sell(round, trader, amount);
            } else {
                let amount = self.rng.gen_range(1..=max_trade);
                self.buy(round, trader, amount);
            }
        }
    }

    fn run_to_cap(&mut self) -> SimulationResult<()> {
        let lot = self.config.scenario.lot_size;
        let mut round = self.config.scenario.random_rounds;
        let mut idle = 0;

        while !self.curve.is_finalized() {
            let trader = self.traders[round % self.traders.len()];
            let cost = self.curve.quote_buy(lot)?;
            let progressed = self.chain.native_balance(trader) >= cost && self.buy(round, trader, lot);
            if progressed {
                idle = 0;
            } else {
                idle += 1;
                if idle >= self.traders.len() {
                    return Err(SimulationError::Stalled {
                        trades: self.trades.len(),
                        reason: format!("no trader completed a lot costing {}", cost),
                    });
                }
            }
            round += 1;
        }

        Ok(())
    }

    fn buy(&mut self, round: usize, trader: Address, amount: u128) -> bool {
        let balance = self.chain.native_balance(trader);
        // Overpay by 1% where the balance allows, to exercise refunds
        let paid = match self.curve.quote_buy(amount) {
            Ok(cost) => cost.saturating_add(cost / 100).min(balance),
            Err(_) => balance,
        };

        let result = self.curve.buy(&mut self.chain, trader, amount, paid);
        self.record(round, trader, TradeKind::Buy, amount, result)
    }

    fn sell(&mut self, round: usize, trader: Address, amount: u128) -> bool {
        let scaled = amount.saturating_mul(self.unit);
        let result = self
            .chain
            .approve_asset(trader, CURVE_ADDRESS, scaled)
            .map_err(ascent_types::CurveError::TransferFailed)
            .and_then(|_| self.curve.sell(&mut self.chain, trader, amount));
        self.record(round, trader, TradeKind::Sell, amount, result)
    }

    fn record(
        &mut self,
        round: usize,
        trader: Address,
        kind: TradeKind,
        amount: u128,
        result: ascent_types::CurveResult<u128>,
    ) -> bool {
        let (value, error) = match result {
            Ok(value) => (value, None),
            Err(err) => {
                debug!("Round {}: {:?} of {} by {} failed: {}", round, kind, amount, trader, err);
                (0, Some(err.to_string()))
            }
        };
        let succeeded = error.is_none();
        self.trades.push(TradeRecord {
            round,
            trader,
            kind,
            amount,
            value,
            error,
        });
        succeeded
    }

    fn units_held(&self, trader: Address) -> u128 {
        self.chain.asset_balance(trader) / self.unit
    }

    fn report(&self) -> ScenarioReport {
        let count = |kind: TradeKind| {
            self.trades
                .iter()
                .filter(|trade| trade.kind == kind && trade.succeeded())
                .count()
        };
        let successful_buys = count(TradeKind::Buy);
        let successful_sells = count(TradeKind::Sell);

        ScenarioReport {
            curve: CURVE_ADDRESS,
            trades: self.trades.clone(),
            successful_buys,
            successful_sells,
            failed_trades: self.trades.len() - successful_buys - successful_sells,
            final_state: self.curve.state(),
            events: self.curve.events(),
            pool: self.chain.venue().pools().next().cloned(),
            fee_recipient_balance: self.chain.native_balance(self.config.curve.fee_recipient),
            curve_native_balance: self.chain.native_balance(CURVE_ADDRESS),
            asset_total_supply: ascent_core::FungibleToken::total_supply(self.chain.ledger()),
        }
    }
}
