/// Fixed-point primitives for the Ascent bonding curve
///
/// This crate provides the overflow-safe arithmetic the pricing engine and
/// the liquidity migrator are built on:
/// - `mul_div` with a 256-bit intermediate and explicit rounding
/// - WAD (1e18) fixed-point multiplication and exponentiation
/// - Integer square roots and venue sqrt-price encoding

pub mod big_int;
pub mod constants;
pub mod error;
pub mod fixed_point;
pub mod sqrt;

// Re-export commonly used items
pub use big_int::*;
pub use constants::*;
pub use error::{MathError, MathResult};
pub use fixed_point::*;
pub use sqrt::*;

pub use ethnum::U256;
