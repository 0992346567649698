/// Integer square roots and venue sqrt-price encoding

use ethnum::U256;

use crate::error::{MathError, MathResult};

/// Newton iterations after the bit-length seed. The seed is within a factor
/// of two of the root, so seven quadratic steps cover the full 256-bit range.
const NEWTON_ITERATIONS: usize = 7;

/// Floor square root of a 256-bit integer
pub fn sqrt(value: U256) -> U256 {
    if value == U256::ZERO {
        return U256::ZERO;
    }

    // 2^ceil(bits/2) >= sqrt(value)
    let bits = 256 - value.leading_zeros();
    let mut x = U256::ONE << ((bits + 1) / 2);

    for _ in 0..NEWTON_ITERATIONS {
        x = (x + value / x) >> 1u32;
    }

    // Floor Newton may settle on floor + 1 or oscillate around k^2 - 1
    let other = value / x;
    if x < other {
        x
    } else {
        other
    }
}

/// Floor square root of a u128
pub fn sqrt_u128(value: u128) -> u128 {
    // The root of a u128 is below 2^64
    let (_, lo) = sqrt(U256::from(value)).into_words();
    lo
}

/// Encode the price `numerator / denominator` as a Q64.96 sqrt price:
/// floor(sqrt(numerator / denominator * 2^192)).
///
/// The X192 price is built by long division, 128 fractional bits and then
/// the remaining 64, so it is the exact floor and stays inside 256 bits.
/// Taking the floor before the root does not change the floored root.
pub fn encode_sqrt_price_x96(numerator: u128, denominator: u128) -> MathResult<U256> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }

    let numerator = U256::from(numerator);
    let denominator = U256::from(denominator);

    // Integer part must fit in the top 64 bits
    let whole = numerator / denominator;
    if whole.leading_zeros() < 192 {
        return Err(MathError::ResultOverflow);
    }

    let remainder = numerator % denominator;
    let high = (remainder << 128u32) / denominator;
    let remainder = (remainder << 128u32) % denominator;
    let low = (remainder << 64u32) / denominator;

    let price_x192 = (whole << 192u32) + (high << 64u32) + low;
    Ok(sqrt(price_x192))
}
