#![no_std]

mod fixed_point;


use fixed_point::{exp, ln, ONE};
use fundraising_common::math::mul_div;
use fundraising_common::{Error, PPM};
use soroban_sdk::{contract, contractimpl, contractmeta, Env};

contractmeta!(
    key = "Description",
    val = "Bancor reserve-ratio bonding curve"
);

#[contract]
pub struct BancorFormula;

fn validate(supply: i128, balance: i128, reserve_ratio: u32, amount: i128) -> Result<(), Error> {
    if supply <= 0 || balance <= 0 || amount < 0 {
        return Err(Error::InvalidAmount);
    }
    if reserve_ratio == 0 || reserve_ratio > PPM {
        return Err(Error::InvalidConfig);
    }
    Ok(())
}

#[contractimpl]
impl BancorFormula {
    /// Bonded tokens minted for depositing `amount` collateral:
    /// `supply * ((1 + amount / balance) ^ (reserve_ratio / PPM) - 1)`.
    pub fn calculate_purchase_return(
        env: Env,
        supply: i128,
        balance: i128,
        reserve_ratio: u32,
        amount: i128,
    ) -> Result<i128, Error> {
        validate(supply, balance, reserve_ratio, amount)?;
        if amount == 0 {
            return Ok(0);
        }
        if reserve_ratio == PPM {
            return mul_div(&env, supply, amount, balance);
        }

        let base = mul_div(&env, balance + amount, ONE, balance)?;
        let exponent = mul_div(&env, ln(base)?, reserve_ratio as i128, PPM as i128)?;
        let growth = exp(exponent)? - ONE;
        mul_div(&env, supply, growth.max(0), ONE)
    }

    /// Collateral paid out for selling `amount` bonded tokens:
    /// `balance * (1 - (1 - amount / supply) ^ (PPM / reserve_ratio))`.
    pub fn calculate_sale_return(
        env: Env,
        supply: i128,
        balance: i128,
        reserve_ratio: u32,
        amount: i128,
    ) -> Result<i128, Error> {
        validate(supply, balance, reserve_ratio, amount)?;
        if amount > supply {
            return Err(Error::InvalidAmount);
        }
        if amount == 0 {
            return Ok(0);
        }
        if amount == supply {
            return Ok(balance);
        }
        if reserve_ratio == PPM {
            return mul_div(&env, balance, amount, supply);
        }

        let base = mul_div(&env, supply - amount, ONE, supply)?;
        // ln(base) <= 0, so the product stays in range for any ratio
        let exponent = ln(base)?
            .checked_mul(PPM as i128)
            .ok_or(Error::MathOverflow)?
            / reserve_ratio as i128;
        let remaining = exp(exponent)?;
        let paid = mul_div(&env, balance, (ONE - remaining).max(0), ONE)?;
        Ok(paid.min(balance))
    }
}
