use soroban_sdk::{Env, I256};

use crate::Error;

/// Parts-per-million scale used for ratios, fees and the presale exchange rate.
pub const PPM: u32 = 1_000_000;

/// `a * b / c` rounded down. Inputs are non-negative token amounts or ratios.
///
/// Falls back to a 256-bit intermediate when the 128-bit product overflows.
pub fn mul_div(env: &Env, a: i128, b: i128, c: i128) -> Result<i128, Error> {
    if c == 0 {
        return Err(Error::MathOverflow);
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / c);
    }
    I256::from_i128(env, a)
        .mul(&I256::from_i128(env, b))
        .div(&I256::from_i128(env, c))
        .to_i128()
        .ok_or(Error::MathOverflow)
}

/// `amount * ppm / PPM` rounded down.
pub fn apply_ppm(env: &Env, amount: i128, ppm: u32) -> Result<i128, Error> {
    mul_div(env, amount, ppm as i128, PPM as i128)
}
