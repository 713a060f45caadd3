#![no_std]
#![allow(clippy::too_many_arguments)]


use fundraising_common::auth::authorize;
use fundraising_common::interfaces::{MarketMakerClient, PresaleClient, ReserveClient};
use fundraising_common::roles::*;
use fundraising_common::{Error, PresaleState};
use soroban_sdk::{contract, contractimpl, contractmeta, contracttype, Address, Env};

contractmeta!(
    key = "Description",
    val = "Fundraising controller - single entry point for users and governance"
);

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ControllerConfig {
    pub acl: Address,
    pub presale: Address,
    pub market_maker: Address,
    pub reserve: Address,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
}

#[contract]
pub struct Controller;

// ==================== Helpers ====================

fn read_config(env: &Env) -> Result<ControllerConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

fn require_presale(env: &Env, config: &ControllerConfig, expected: PresaleState) -> Result<(), Error> {
    if PresaleClient::new(env, &config.presale).state() != expected {
        return Err(Error::InvalidState);
    }
    Ok(())
}

#[contractimpl]
impl Controller {
    pub fn initialize(
        env: Env,
        acl: Address,
        presale: Address,
        market_maker: Address,
        reserve: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(Error::AlreadyInitialized);
        }
        env.storage().instance().set(
            &DataKey::Config,
            &ControllerConfig {
                acl,
                presale,
                market_maker,
                reserve,
            },
        );
        Ok(())
    }

    pub fn has_initialized(env: Env) -> bool {
        env.storage().instance().has(&DataKey::Config)
    }

    pub fn get_config(env: Env) -> Result<ControllerConfig, Error> {
        read_config(&env)
    }

    // ==================== Presale ====================

    pub fn open_presale(env: Env, caller: Address) -> Result<(), Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &OPEN_PRESALE_ROLE)?;
        require_presale(&env, &config, PresaleState::Pending)?;
        PresaleClient::new(&env, &config.presale).open_presale(&env.current_contract_address());
        Ok(())
    }

    pub fn close_presale(env: Env) -> Result<(), Error> {
        let config = read_config(&env)?;
        require_presale(&env, &config, PresaleState::Finished)?;
        PresaleClient::new(&env, &config.presale).close_presale();
        Ok(())
    }

    pub fn contribute(env: Env, contributor: Address, amount: i128) -> Result<(), Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &contributor, &CONTRIBUTE_ROLE)?;
        require_presale(&env, &config, PresaleState::Funding)?;
        PresaleClient::new(&env, &config.presale).contribute(
            &env.current_contract_address(),
            &contributor,
            &amount,
        );
        Ok(())
    }

    pub fn presale_state(env: Env) -> Result<PresaleState, Error> {
        let config = read_config(&env)?;
        Ok(PresaleClient::new(&env, &config.presale).state())
    }

    // ==================== Market maker ====================

    pub fn open_buy_order(
        env: Env,
        buyer: Address,
        collateral: Address,
        amount: i128,
    ) -> Result<u32, Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &buyer, &OPEN_BUY_ORDER_ROLE)?;
        require_presale(&env, &config, PresaleState::Closed)?;
        Ok(MarketMakerClient::new(&env, &config.market_maker).open_buy_order(
            &env.current_contract_address(),
            &buyer,
            &collateral,
            &amount,
        ))
    }

    pub fn open_sell_order(
        env: Env,
        seller: Address,
        collateral: Address,
        amount: i128,
    ) -> Result<u32, Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &seller, &OPEN_SELL_ORDER_ROLE)?;
        require_presale(&env, &config, PresaleState::Closed)?;
        Ok(MarketMakerClient::new(&env, &config.market_maker).open_sell_order(
            &env.current_contract_address(),
            &seller,
            &collateral,
            &amount,
        ))
    }

    pub fn claim_buy_order(
        env: Env,
        buyer: Address,
        batch_id: u32,
        collateral: Address,
    ) -> Result<i128, Error> {
        let config = read_config(&env)?;
        Ok(MarketMakerClient::new(&env, &config.market_maker).claim_buy_order(
            &buyer,
            &batch_id,
            &collateral,
        ))
    }

    pub fn claim_sell_order(
        env: Env,
        seller: Address,
        batch_id: u32,
        collateral: Address,
    ) -> Result<i128, Error> {
        let config = read_config(&env)?;
        Ok(MarketMakerClient::new(&env, &config.market_maker).claim_sell_order(
            &seller,
            &batch_id,
            &collateral,
        ))
    }

    // ==================== Governance ====================

    /// Whitelists `collateral` on the market maker and protects it in the reserve.
    pub fn add_collateral_token(
        env: Env,
        caller: Address,
        collateral: Address,
        virtual_supply: i128,
        virtual_balance: i128,
        reserve_ratio: u32,
        slippage: u32,
    ) -> Result<(), Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &ADD_COLLATERAL_TOKEN_ROLE)?;
        let this = env.current_contract_address();
        let reserve = ReserveClient::new(&env, &config.reserve);
        if !reserve.is_protected(&collateral) {
            reserve.add_protected_token(&this, &collateral);
        }
        MarketMakerClient::new(&env, &config.market_maker).add_collateral_token(
            &this,
            &collateral,
            &virtual_supply,
            &virtual_balance,
            &reserve_ratio,
            &slippage,
        );
        Ok(())
    }

    pub fn update_collateral_token(
        env: Env,
        caller: Address,
        collateral: Address,
        virtual_supply: i128,
        virtual_balance: i128,
        reserve_ratio: u32,
        slippage: u32,
    ) -> Result<(), Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &UPDATE_COLLATERAL_TOKEN_ROLE)?;
        MarketMakerClient::new(&env, &config.market_maker).update_collateral_token(
            &env.current_contract_address(),
            &collateral,
            &virtual_supply,
            &virtual_balance,
            &reserve_ratio,
            &slippage,
        );
        Ok(())
    }

    pub fn remove_collateral_token(
        env: Env,
        caller: Address,
        collateral: Address,
    ) -> Result<(), Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &REMOVE_COLLATERAL_TOKEN_ROLE)?;
        MarketMakerClient::new(&env, &config.market_maker)
            .remove_collateral_token(&env.current_contract_address(), &collateral);
        Ok(())
    }

    pub fn update_beneficiary(env: Env, caller: Address, beneficiary: Address) -> Result<(), Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &UPDATE_BENEFICIARY_ROLE)?;
        MarketMakerClient::new(&env, &config.market_maker)
            .update_beneficiary(&env.current_contract_address(), &beneficiary);
        Ok(())
    }

    pub fn update_fees(env: Env, caller: Address, buy_fee: u32, sell_fee: u32) -> Result<(), Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &UPDATE_FEES_ROLE)?;
        MarketMakerClient::new(&env, &config.market_maker).update_fees(
            &env.current_contract_address(),
            &buy_fee,
            &sell_fee,
        );
        Ok(())
    }
}
