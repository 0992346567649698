/// Exponential curve pricing
///
/// Unit `n` (counting from zero) costs `p0 · r^n`, so buying from zero to
/// `n` costs `totalCost(n) = p0 · (r^n − 1) / (r − 1)` with `p0` in native
/// base units and `r` WAD scaled. Trades are quoted from the marginal price
/// at the starting supply times the geometric series of the trade size,
/// which keeps exponents no larger than the supply and the trade.

use ascent_math::{mul_div, pow_fixed, Rounding, WAD};
use ascent_types::{CurveConfig, CurveError, CurveResult};
use tracing::debug;

/// Pricing engine for one curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurvePricing {
    initial_price: u128,
    ratio: u128,
}

impl CurvePricing {
    pub fn new(initial_price: u128, ratio: u128) -> CurveResult<Self> {
        if ratio <= WAD {
            return Err(CurveError::invalid_config(format!(
                "ratio {} must exceed {}",
                ratio, WAD
            )));
        }
        Ok(Self {
            initial_price,
            ratio,
        })
    }

    pub fn from_config(config: &CurveConfig) -> CurveResult<Self> {
        Self::new(config.initial_price, config.ratio)
    }

    pub fn initial_price(&self) -> u128 {
        self.initial_price
    }

    pub fn ratio(&self) -> u128 {
        self.ratio
    }

    /// Price of the next whole unit once `supply` units are outstanding
    pub fn marginal_price(&self, supply: u128) -> CurveResult<u128> {
        let growth = pow_fixed(self.ratio, supply)?;
        Ok(mul_div(self.initial_price, growth, WAD, Rounding::Down)?)
    }

    /// Cost of buying `amount` units starting at `supply`, rounded up
    pub fn buy_price(&self, supply: u128, amount: u128) -> CurveResult<u128> {
        if amount == 0 {
            return Err(CurveError::InvalidAmount);
        }

        let cost = self.series(supply, amount, Rounding::Up)?;
        debug!("Buy quote: supply={} amount={} cost={}", supply, amount, cost);
        Ok(cost)
    }

    /// Refund for selling `amount` units out of `supply`, rounded down.
    ///
    /// Equal to `totalCost(supply) − totalCost(supply − amount)`, evaluated
    /// from the marginal price at `supply − amount`. A buy and an equal sell
    /// at the same point therefore share every intermediate and differ only
    /// in the final rounding.
    pub fn sell_price(&self, supply: u128, amount: u128) -> CurveResult<u128> {
        if amount == 0 || amount > supply {
            return Err(CurveError::InvalidAmount);
        }

        let refund = self.series(supply - amount, amount, Rounding::Down)?;
        debug!("Sell quote: supply={} amount={} refund={}", supply, amount, refund);
        Ok(refund)
    }

    /// Cumulative cost of the first `n` units, rounded down
    pub fn total_cost(&self, n: u128) -> CurveResult<u128> {
        if n == 0 {
            return Ok(0);
        }
        Ok(mul_div(
            self.initial_price,
            self.geometric_numerator(n)?,
            self.ratio - WAD,
            Rounding::Down,
        )?)
    }

    // marginal(start) · (r^amount − 1) / (r − 1)
    fn series(&self, start: u128, amount: u128, rounding: Rounding) -> CurveResult<u128> {
        let marginal = self.marginal_price(start)?;
        Ok(mul_div(
            marginal,
            self.geometric_numerator(amount)?,
            self.ratio - WAD,
            rounding,
        )?)
    }

    fn geometric_numerator(&self, n: u128) -> CurveResult<u128> {
        // r > 1 so r^n >= 1 for every n
        Ok(pow_fixed(self.ratio, n)? - WAD)
    }
}
