//! 1e18 fixed-point `ln` and `exp` used by the curve.

use fundraising_common::Error;

pub const ONE: i128 = 1_000_000_000_000_000_000;
const TWO: i128 = 2 * ONE;
const LN2: i128 = 693_147_180_559_945_309;

/// Natural logarithm of `x / ONE`, scaled by `ONE`. `x` must be positive.
pub fn ln(x: i128) -> Result<i128, Error> {
    if x <= 0 {
        return Err(Error::InvalidAmount);
    }
    // bring x into [1, 2) and remember the power of two
    let mut x = x;
    let mut k: i128 = 0;
    while x >= TWO {
        x /= 2;
        k += 1;
    }
    while x < ONE {
        x *= 2;
        k -= 1;
    }

    // ln(x) = 2 * atanh(z), z = (x - 1) / (x + 1) <= 1/3
    let z = (x - ONE) * ONE / (x + ONE);
    let z2 = z * z / ONE;
    let mut power = z;
    let mut sum = 0i128;
    let mut n = 1i128;
    while power != 0 {
        sum += power / n;
        power = power * z2 / ONE;
        n += 2;
    }
    Ok(k * LN2 + 2 * sum)
}

/// `e^(y / ONE)`, scaled by `ONE`.
pub fn exp(y: i128) -> Result<i128, Error> {
    // y = k * ln2 + r, 0 <= r < ln2
    let k = y.div_euclid(LN2);
    let r = y.rem_euclid(LN2);

    let mut term = ONE;
    let mut sum = ONE;
    let mut n = 1i128;
    while term != 0 {
        term = term * r / ONE / n;
        sum += term;
        n += 1;
    }

    if k >= 0 {
        let shift = u32::try_from(k).map_err(|_| Error::MathOverflow)?;
        1i128
            .checked_shl(shift)
            .filter(|factor| *factor > 0)
            .and_then(|factor| sum.checked_mul(factor))
            .ok_or(Error::MathOverflow)
    } else if k <= -127 {
        Ok(0)
    } else {
        Ok(sum >> (-k) as u32)
    }
}
