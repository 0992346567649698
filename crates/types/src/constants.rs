/// Protocol constants shared by the curve, the migrator and their hosts

pub use ascent_math::{MAX_TICK, MIN_TICK, WAD};

// ============================================================================
// Supply Constants
// ============================================================================

/// Fixed total supply reached at finalization, in whole units
pub const DEFAULT_TARGET_TOTAL_SUPPLY: u128 = 1_000_000_000;

/// Ledger precision used when none is configured
pub const DEFAULT_LEDGER_DECIMALS: u8 = 18;

/// Largest ledger precision whose unit (10^decimals) keeps the scaled
/// target supply comfortably inside u128
pub const MAX_LEDGER_DECIMALS: u8 = 24;

// ============================================================================
// Fee Constants
// ============================================================================

/// Exclusive upper bound on the protocol fee fraction (100%). A curve must
/// keep some raised value to seed its pool.
pub const MAX_PROTOCOL_FEE_PERCENT: u128 = WAD;

// ============================================================================
// Pricing Constants
// ============================================================================

/// Smallest allowed price increase from the first unit to the second, in
/// native base units. The marginal price is floored to base units, so a
/// smaller step lets rounding hold it flat across later units.
pub const MIN_PRICE_STEP: u128 = 2;

/// Scale a whole-unit amount to ledger base units
pub fn scale_to_ledger(amount: u128, decimals: u8) -> Option<u128> {
    10u128
        .checked_pow(u32::from(decimals))
        .and_then(|unit| amount.checked_mul(unit))
}
