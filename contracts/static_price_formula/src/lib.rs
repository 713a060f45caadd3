#![no_std]


use fundraising_common::math::mul_div;
use fundraising_common::Error;
use soroban_sdk::{contract, contractimpl, contractmeta, contracttype, Env};

contractmeta!(
    key = "Description",
    val = "Frozen-price formula: buys disabled, sells at a snapshot price"
);

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceSnapshot {
    pub balance: i128,
    pub supply: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Snapshot,
}

#[contract]
pub struct StaticPriceFormula;

fn read_snapshot(env: &Env) -> Result<PriceSnapshot, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Snapshot)
        .ok_or(Error::NotInitialized)
}

/// Drop-in replacement for the bonding curve once the market is wound down.
#[contractimpl]
impl StaticPriceFormula {
    pub fn initialize(env: Env, balance_snapshot: i128, supply_snapshot: i128) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Snapshot) {
            return Err(Error::AlreadyInitialized);
        }
        if balance_snapshot < 0 || supply_snapshot <= 0 {
            return Err(Error::InvalidConfig);
        }
        env.storage().instance().set(
            &DataKey::Snapshot,
            &PriceSnapshot {
                balance: balance_snapshot,
                supply: supply_snapshot,
            },
        );
        Ok(())
    }

    pub fn has_initialized(env: Env) -> bool {
        env.storage().instance().has(&DataKey::Snapshot)
    }

    pub fn snapshot(env: Env) -> Result<PriceSnapshot, Error> {
        read_snapshot(&env)
    }

    /// Buys are disabled.
    pub fn calculate_purchase_return(
        _env: Env,
        _supply: i128,
        _balance: i128,
        _reserve_ratio: u32,
        _amount: i128,
    ) -> Result<i128, Error> {
        Ok(0)
    }

    pub fn calculate_sale_return(
        env: Env,
        _supply: i128,
        _balance: i128,
        _reserve_ratio: u32,
        amount: i128,
    ) -> Result<i128, Error> {
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        let snapshot = read_snapshot(&env)?;
        mul_div(&env, amount, snapshot.balance, snapshot.supply)
    }
}
