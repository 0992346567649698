//! Double-width multiply-divide
//!
//! The product of two `u128` operands always fits in 256 bits, so `mul_div`
//! never overflows before the division. Only the final quotient is range
//! checked.

use ethnum::U256;

use crate::error::{MathError, MathResult};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

/// Narrow a 256-bit value back to `u128`
pub fn u256_to_u128(value: U256) -> MathResult<u128> {
    let (hi, lo) = value.into_words();
    if hi != 0 {
        return Err(MathError::ResultOverflow);
    }
    Ok(lo)
}

/// Multiply two values and divide by a third with specified rounding
/// result = (a * b) / denominator
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> MathResult<u128> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }

    let product = U256::from(a) * U256::from(b);
    let denominator = U256::from(denominator);

    let mut quotient = product / denominator;
    if rounding == Rounding::Up && product % denominator != U256::ZERO {
        // (2^128 - 1)^2 leaves room for the increment
        quotient += U256::ONE;
    }

    u256_to_u128(quotient)
}

/// 256-bit multiply-divide for operands already in the wide domain.
///
/// Unlike `mul_div`, the product itself may overflow; that is reported as
/// `MultiplicationOverflow`.
pub fn mul_div_u256(a: U256, b: U256, denominator: U256, rounding: Rounding) -> MathResult<U256> {
    if denominator == U256::ZERO {
        return Err(MathError::DivisionByZero);
    }

    let product = a
        .checked_mul(b)
        .ok_or(MathError::MultiplicationOverflow)?;

    let quotient = product / denominator;
    if rounding == Rounding::Up && product % denominator != U256::ZERO {
        return quotient
            .checked_add(U256::ONE)
            .ok_or(MathError::ResultOverflow);
    }

    Ok(quotient)
}
