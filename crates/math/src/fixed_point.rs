/// WAD (1e18) fixed-point arithmetic

use crate::big_int::{mul_div, Rounding};
use crate::constants::WAD;
use crate::error::{MathError, MathResult};

// ============================================================================
// Fixed-Point Arithmetic Operations
// ============================================================================

/// Multiply two WAD fixed-point numbers, rounding down
pub fn mul_fixed(a: u128, b: u128) -> MathResult<u128> {
    mul_div(a, b, WAD, Rounding::Down).map_err(|err| match err {
        MathError::ResultOverflow => MathError::MultiplicationOverflow,
        other => other,
    })
}

/// Divide two WAD fixed-point numbers, rounding down
pub fn div_fixed(a: u128, b: u128) -> MathResult<u128> {
    mul_div(a, WAD, b, Rounding::Down)
}

/// Calculate base^exponent in WAD fixed point for an integer exponent.
///
/// Exponentiation by squaring. Every step goes through `mul_fixed`, and the
/// running square is only advanced while exponent bits remain, so an overflow
/// is reported only when a multiplication that matters would overflow.
pub fn pow_fixed(base: u128, exponent: u128) -> MathResult<u128> {
    let mut result = WAD;
    let mut base_power = base;
    let mut exp = exponent;

    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_fixed(result, base_power)?;
        }
        exp >>= 1;
        if exp > 0 {
            base_power = mul_fixed(base_power, base_power)?;
        }
    }

    Ok(result)
}
