#![no_std]


use fundraising_common::interfaces::BondedTokenClient;
use fundraising_common::math::mul_div;
use fundraising_common::Error;
use soroban_sdk::{
    contract, contractimpl, contractmeta, contracttype, symbol_short, token, Address, Env, Symbol,
};

contractmeta!(
    key = "Description",
    val = "Converts bonded tokens to collateral at a fixed rate"
);

/// Rates are expressed with 18 decimals.
pub const PRECISION: i128 = 1_000_000_000_000_000_000;

const CONVERTER: Symbol = symbol_short!("CONVERTER");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConverterConfig {
    pub admin: Address,
    pub bonded_token: Address,
    pub collateral_token: Address,
    pub conversion_rate: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
}

#[derive(Clone)]
#[contracttype]
pub struct ConvertEvent {
    pub sender: Address,
    pub bonded_amount: i128,
    pub collateral_amount: i128,
}

#[contract]
pub struct FixedRateConverter;

fn read_config(env: &Env) -> Result<ConverterConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

fn require_admin(env: &Env) -> Result<ConverterConfig, Error> {
    let config = read_config(env)?;
    config.admin.require_auth();
    Ok(config)
}

fn collateral_balance(env: &Env, config: &ConverterConfig) -> i128 {
    token::Client::new(env, &config.collateral_token).balance(&env.current_contract_address())
}

#[contractimpl]
impl FixedRateConverter {
    pub fn initialize(
        env: Env,
        admin: Address,
        bonded_token: Address,
        collateral_token: Address,
        conversion_rate: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(Error::AlreadyInitialized);
        }
        if conversion_rate <= 0 {
            return Err(Error::InvalidConfig);
        }
        env.storage().instance().set(
            &DataKey::Config,
            &ConverterConfig {
                admin,
                bonded_token,
                collateral_token,
                conversion_rate,
            },
        );
        Ok(())
    }

    pub fn admin(env: Env) -> Result<Address, Error> {
        Ok(read_config(&env)?.admin)
    }

    pub fn get_config(env: Env) -> Result<ConverterConfig, Error> {
        read_config(&env)
    }

    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), Error> {
        let mut config = require_admin(&env)?;
        config.admin = new_admin.clone();
        env.storage().instance().set(&DataKey::Config, &config);
        env.events()
            .publish((CONVERTER, symbol_short!("ADMIN")), new_admin);
        Ok(())
    }

    /// Collateral paid for `amount` bonded tokens.
    pub fn convert_amount(env: Env, amount: i128) -> Result<i128, Error> {
        let config = read_config(&env)?;
        mul_div(&env, amount, config.conversion_rate, PRECISION)
    }

    /// Largest bonded amount the current collateral balance can cover.
    pub fn convert_max(env: Env) -> Result<i128, Error> {
        let config = read_config(&env)?;
        mul_div(
            &env,
            collateral_balance(&env, &config),
            PRECISION,
            config.conversion_rate,
        )
    }

    /// Burns `amount` of the sender's bonded tokens and pays out collateral.
    pub fn convert(env: Env, sender: Address, amount: i128) -> Result<i128, Error> {
        sender.require_auth();
        let config = read_config(&env)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let bonded = BondedTokenClient::new(&env, &config.bonded_token);
        if bonded.balance(&sender) < amount {
            return Err(Error::InsufficientBalance);
        }
        let payout = mul_div(&env, amount, config.conversion_rate, PRECISION)?;
        if payout <= 0 || payout > collateral_balance(&env, &config) {
            return Err(Error::InsufficientBalance);
        }

        let this = env.current_contract_address();
        bonded.burn(&this, &sender, &amount);
        token::Client::new(&env, &config.collateral_token).transfer(&this, &sender, &payout);

        env.events().publish(
            (CONVERTER, symbol_short!("CONVERT")),
            ConvertEvent {
                sender,
                bonded_amount: amount,
                collateral_amount: payout,
            },
        );
        Ok(payout)
    }

    /// Sends the whole collateral balance to the admin.
    pub fn withdraw_collateral(env: Env) -> Result<i128, Error> {
        let config = require_admin(&env)?;
        let balance = collateral_balance(&env, &config);
        if balance > 0 {
            token::Client::new(&env, &config.collateral_token).transfer(
                &env.current_contract_address(),
                &config.admin,
                &balance,
            );
        }
        Ok(balance)
    }
}
