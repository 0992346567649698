/// Curve configuration, fixed at construction

use ascent_math::{mul_div, Rounding};
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount_serde::decimal_u128;
use crate::constants::*;
use crate::errors::CurveError;
use crate::CurveResult;

// ============================================================================
// Fee Tier
// ============================================================================

/// Venue fee tier, in hundredths of a basis point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
    /// 0.01%
    Lowest,
    /// 0.05%
    Low,
    /// 0.3%
    Medium,
    /// 1%
    High,
}

impl FeeTier {
    pub const ALL: [FeeTier; 4] = [FeeTier::Lowest, FeeTier::Low, FeeTier::Medium, FeeTier::High];

    /// Fee in hundredths of a basis point, as the venue encodes it
    pub fn fee(self) -> u32 {
        match self {
            FeeTier::Lowest => 100,
            FeeTier::Low => 500,
            FeeTier::Medium => 3_000,
            FeeTier::High => 10_000,
        }
    }

    pub fn tick_spacing(self) -> i32 {
        match self {
            FeeTier::Lowest => 1,
            FeeTier::Low => 10,
            FeeTier::Medium => 60,
            FeeTier::High => 200,
        }
    }

    /// Widest usable tick range for this tier's spacing
    pub fn full_range_ticks(self) -> (i32, i32) {
        let spacing = self.tick_spacing();
        ((MIN_TICK / spacing) * spacing, (MAX_TICK / spacing) * spacing)
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = CurveError;

    fn try_from(fee: u32) -> Result<Self, Self::Error> {
        FeeTier::ALL
            .into_iter()
            .find(|tier| tier.fee() == fee)
            .ok_or_else(|| CurveError::invalid_config(format!("unsupported fee tier {}", fee)))
    }
}

impl From<FeeTier> for u32 {
    fn from(tier: FeeTier) -> Self {
        tier.fee()
    }
}

impl Default for FeeTier {
    fn default() -> Self {
        FeeTier::Medium
    }
}

// ============================================================================
// Curve Configuration
// ============================================================================

/// Immutable parameters of one bonding curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Price of the first whole unit, in native base units (`P0`)
    #[serde(with = "decimal_u128")]
    pub initial_price: u128,

    /// Per-unit growth ratio, WAD scaled, strictly above 1e18 (`RATIO`)
    #[serde(with = "decimal_u128")]
    pub ratio: u128,

    /// Funding cap in native base units (`CAP`)
    #[serde(with = "decimal_u128")]
    pub cap: u128,

    #[serde(default)]
    pub fee_tier: FeeTier,

    pub fee_recipient: Address,

    /// WAD-scaled fraction of the raised value kept by the protocol
    #[serde(with = "decimal_u128", default)]
    pub protocol_fee_percent: u128,

    /// Whole units outstanding once the curve finalizes
    #[serde(with = "decimal_u128", default = "default_target_total_supply")]
    pub target_total_supply: u128,
}

fn default_target_total_supply() -> u128 {
    DEFAULT_TARGET_TOTAL_SUPPLY
}

impl CurveConfig {
    /// Configuration with the default fee tier, no protocol fee and the
    /// default target supply
    pub fn new(initial_price: u128, ratio: u128, cap: u128, fee_recipient: Address) -> Self {
        Self {
            initial_price,
            ratio,
            cap,
            fee_tier: FeeTier::default(),
            fee_recipient,
            protocol_fee_percent: 0,
            target_total_supply: DEFAULT_TARGET_TOTAL_SUPPLY,
        }
    }

    pub fn with_fee_tier(mut self, fee_tier: FeeTier) -> Self {
        self.fee_tier = fee_tier;
        self
    }

    pub fn with_protocol_fee_percent(mut self, protocol_fee_percent: u128) -> Self {
        self.protocol_fee_percent = protocol_fee_percent;
        self
    }

    pub fn with_target_total_supply(mut self, target_total_supply: u128) -> Self {
        self.target_total_supply = target_total_supply;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> CurveResult<()> {
        if self.initial_price == 0 {
            return Err(CurveError::invalid_config("initial_price must be positive"));
        }

        if self.ratio <= WAD {
            return Err(CurveError::invalid_config(format!(
                "ratio {} must exceed {}",
                self.ratio, WAD
            )));
        }

        let step = mul_div(self.initial_price, self.ratio - WAD, WAD, Rounding::Down)?;
        if step < MIN_PRICE_STEP {
            return Err(CurveError::invalid_config(format!(
                "price step {} between the first two units is below {}",
                step, MIN_PRICE_STEP
            )));
        }

        if self.cap == 0 {
            return Err(CurveError::invalid_config("cap must be positive"));
        }

        if self.fee_recipient.is_zero() {
            return Err(CurveError::invalid_config("fee_recipient must be set"));
        }

        if self.protocol_fee_percent >= MAX_PROTOCOL_FEE_PERCENT {
            return Err(CurveError::invalid_config(format!(
                "protocol_fee_percent {} must be below {}",
                self.protocol_fee_percent, MAX_PROTOCOL_FEE_PERCENT
            )));
        }

        if self.target_total_supply == 0 {
            return Err(CurveError::invalid_config(
                "target_total_supply must be positive",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CurveConfig {
        CurveConfig::new(
            4_900_000_000,
            1_000_000_003_180_000_000,
            6_000_000_000_000_000_000,
            Address::from_low_u64(0xfee),
        )
    }

    #[test]
    fn test_config_validation() {
        let config = sample();
        assert!(config.validate().is_ok());

        let mut flat = config.clone();
        flat.ratio = WAD;
        assert!(matches!(flat.validate(), Err(CurveError::InvalidConfig(_))));

        let mut no_cap = config.clone();
        no_cap.cap = 0;
        assert!(no_cap.validate().is_err());

        let mut free = config.clone();
        free.initial_price = 0;
        assert!(free.validate().is_err());

        let mut nobody = config.clone();
        nobody.fee_recipient = Address::ZERO;
        assert!(nobody.validate().is_err());

        assert!(config.clone().with_protocol_fee_percent(WAD - 1).validate().is_ok());
        assert!(config.clone().with_protocol_fee_percent(WAD).validate().is_err());
        assert!(config.clone().with_protocol_fee_percent(WAD + 1).validate().is_err());
        assert!(config.with_target_total_supply(0).validate().is_err());
    }

    #[test]
    fn test_price_step_validation() {
        let recipient = Address::from_low_u64(0xfee);

        // Price never leaves one base unit
        let flat = CurveConfig::new(1, WAD + 1, WAD, recipient);
        assert!(matches!(flat.validate(), Err(CurveError::InvalidConfig(_))));

        // 4.9e9 · 1e3 / 1e18 rounds to zero
        let slow = CurveConfig::new(4_900_000_000, WAD + 1_000, WAD, recipient);
        assert!(slow.validate().is_err());

        // Exactly at the smallest step
        let edge = CurveConfig::new(2_000_000_000, WAD + 1_000_000_000, WAD, recipient);
        assert!(edge.validate().is_ok());
        let below = CurveConfig::new(1_999_999_999, WAD + 1_000_000_000, WAD, recipient);
        assert!(below.validate().is_err());

        // Overflowing step is a math error, not a panic
        let huge = CurveConfig::new(u128::MAX, 3 * WAD, WAD, recipient);
        assert!(matches!(huge.validate(), Err(CurveError::Math(_))));
    }

    #[test]
    fn test_fee_tiers() {
        for tier in FeeTier::ALL {
            assert_eq!(FeeTier::try_from(tier.fee()).unwrap(), tier);
            let (lower, upper) = tier.full_range_ticks();
            assert_eq!(lower, -upper);
            assert_eq!(lower % tier.tick_spacing(), 0);
            assert!(lower >= MIN_TICK && upper <= MAX_TICK);
        }
        assert_eq!(FeeTier::Medium.full_range_ticks(), (-887_220, 887_220));
        assert_eq!(FeeTier::High.full_range_ticks(), (-887_200, 887_200));
        assert!(FeeTier::try_from(2_500).is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let text = r#"
            initial_price = 4900000000
            ratio = "1_000_000_003_180_000_000"
            cap = "6000000000000000000"
            fee_tier = 10000
            fee_recipient = "0x0000000000000000000000000000000000000fee"
            protocol_fee_percent = "50000000000000000"
        "#;
        let config: CurveConfig = toml::from_str(text).unwrap();
        assert_eq!(config.ratio, 1_000_000_003_180_000_000);
        assert_eq!(config.fee_tier, FeeTier::High);
        assert_eq!(config.protocol_fee_percent, WAD / 20);
        assert_eq!(config.target_total_supply, DEFAULT_TARGET_TOTAL_SUPPLY);
        assert!(config.validate().is_ok());

        let rendered = toml::to_string(&config).unwrap();
        let back: CurveConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(back, config);

        assert!(toml::from_str::<CurveConfig>(&text.replace("10000", "2500")).is_err());
    }
}
