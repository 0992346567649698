//! # Math Constants
//!
//! Fixed-point scales and the concentrated-liquidity venue's price bounds.

use ethnum::U256;

// ============================================================================
// Fixed-Point Scales
// ============================================================================

/// WAD fixed-point scale: 1e18
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Q96 scale used by the venue's sqrt price representation
pub const Q96: U256 = U256::from_words(0, 1u128 << 96);

// ============================================================================
// Venue Price Bounds
// ============================================================================

/// Minimum tick supported by the venue
pub const MIN_TICK: i32 = -887_272;

/// Maximum tick supported by the venue
pub const MAX_TICK: i32 = 887_272;

/// Sqrt price (Q64.96) at `MIN_TICK`
pub const MIN_SQRT_RATIO: U256 = U256::from_words(0, 4_295_128_739);

/// Sqrt price (Q64.96) at `MAX_TICK`: 1461446703485210103287273052203988822378723970342
pub const MAX_SQRT_RATIO: U256 = U256::from_words(
    4_294_805_859,
    0xefd1fc6a506488495d951d5263988d26,
);
