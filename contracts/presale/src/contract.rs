use crate::events::{self, CloseEvent, ContributeEvent};
use crate::storage::*;
use crate::types::*;
use fundraising_common::auth::authorize;
use fundraising_common::interfaces::{BondedTokenClient, MarketMakerClient};
use fundraising_common::math::mul_div;
use fundraising_common::roles::{CONTRIBUTE_ROLE, OPEN_ROLE, REDUCE_BENEFICIARY_PCT_ROLE};
use fundraising_common::{guard, Error, PresaleState, PPM};
use soroban_sdk::{contract, contractimpl, contractmeta, token, Address, Env};

// Metadata that is added on to every WASM custom section
contractmeta!(
    key = "Description",
    val = "Fixed-rate presale feeding a bonding-curve market"
);

#[contract]
pub struct PresaleContract;

fn read_config(env: &Env) -> Result<PresaleConfig, Error> {
    get_config(env).ok_or(Error::NotInitialized)
}

fn current_state(env: &Env, config: &PresaleConfig) -> PresaleState {
    if is_closed(env) {
        return PresaleState::Closed;
    }
    if !is_opened(env) {
        return PresaleState::Pending;
    }
    let ends_at = get_open_date(env).saturating_add(config.period);
    if env.ledger().timestamp() >= ends_at {
        PresaleState::Finished
    } else {
        PresaleState::Funding
    }
}

fn require_state(env: &Env, config: &PresaleConfig, expected: PresaleState) -> Result<(), Error> {
    if current_state(env, config) != expected {
        return Err(Error::InvalidState);
    }
    Ok(())
}

fn to_tokens(env: &Env, config: &PresaleConfig, amount: i128) -> Result<i128, Error> {
    mul_div(env, amount, config.exchange_rate, PPM as i128)
}

#[contractimpl]
impl PresaleContract {
    pub fn initialize(
        env: Env,
        acl: Address,
        controller: Address,
        market_maker: Address,
        bonded_token: Address,
        reserve: Address,
        beneficiary: Address,
        collateral_token: Address,
        params: PresaleParams,
    ) -> Result<(), Error> {
        if get_config(&env).is_some() {
            return Err(Error::AlreadyInitialized);
        }
        if params.period == 0
            || params.exchange_rate <= 0
            || params.minting_for_beneficiary_ppm >= PPM
        {
            return Err(Error::InvalidConfig);
        }

        set_config(
            &env,
            &PresaleConfig {
                acl,
                controller,
                market_maker,
                bonded_token,
                reserve,
                beneficiary,
                collateral_token,
                period: params.period,
                exchange_rate: params.exchange_rate,
                minting_for_beneficiary_ppm: params.minting_for_beneficiary_ppm,
            },
        );
        set_open_date(&env, params.open_date);
        set_total_raised(&env, 0);
        set_total_sold(&env, 0);
        set_contributors_counter(&env, 0);
        Ok(())
    }

    pub fn has_initialized(env: Env) -> bool {
        get_config(&env).is_some()
    }

    /// Derived on every call: Finished is reached by time alone, Funding
    /// only through `open_presale`.
    pub fn state(env: Env) -> Result<PresaleState, Error> {
        let config = read_config(&env)?;
        Ok(current_state(&env, &config))
    }

    pub fn open_presale(env: Env, caller: Address) -> Result<(), Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &OPEN_ROLE)?;
        require_state(&env, &config, PresaleState::Pending)?;

        let now = env.ledger().timestamp();
        let mut open_date = get_open_date(&env);
        if open_date == 0 || open_date > now {
            open_date = now;
            set_open_date(&env, open_date);
        }
        if now >= open_date.saturating_add(config.period) {
            return Err(Error::InvalidState);
        }

        set_opened(&env);
        events::emit_open(&env, open_date);
        Ok(())
    }

    /// Pulls `amount` collateral from `contributor` and mints bonded tokens
    /// at the fixed exchange rate.
    pub fn contribute(
        env: Env,
        caller: Address,
        contributor: Address,
        amount: i128,
    ) -> Result<(), Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &CONTRIBUTE_ROLE)?;
        require_state(&env, &config, PresaleState::Funding)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let tokens = to_tokens(&env, &config, amount)?;
        if tokens <= 0 {
            return Err(Error::InvalidAmount);
        }
        guard::enter(&env)?;

        token::Client::new(&env, &config.collateral_token).transfer(
            &contributor,
            &env.current_contract_address(),
            &amount,
        );
        BondedTokenClient::new(&env, &config.bonded_token).mint(
            &env.current_contract_address(),
            &contributor,
            &tokens,
        );

        let previous = get_contribution(&env, &contributor);
        if previous.is_none() {
            set_contributors_counter(&env, get_contributors_counter(&env) + 1);
        }
        set_contribution(&env, &contributor, previous.unwrap_or(0) + amount);
        set_total_raised(&env, get_total_raised(&env) + amount);
        set_total_sold(&env, get_total_sold(&env) + tokens);

        events::emit_contribute(
            &env,
            ContributeEvent {
                contributor,
                value: amount,
                amount: tokens,
            },
        );
        guard::exit(&env);
        Ok(())
    }

    /// Splits the raised collateral between the reserve and the beneficiary,
    /// mints the beneficiary allocation and opens trading. Anyone may call it
    /// once the funding period is over.
    pub fn close_presale(env: Env) -> Result<(), Error> {
        let config = read_config(&env)?;
        require_state(&env, &config, PresaleState::Finished)?;
        guard::enter(&env)?;

        let this = env.current_contract_address();
        let total_raised = get_total_raised(&env);
        let m = config.minting_for_beneficiary_ppm as i128;
        let base = PPM as i128 - m;

        let beneficiary_tokens = mul_div(&env, total_raised, m, base)?;
        if beneficiary_tokens > 0 {
            BondedTokenClient::new(&env, &config.bonded_token).mint(
                &this,
                &config.beneficiary,
                &beneficiary_tokens,
            );
        }

        let market_maker = MarketMakerClient::new(&env, &config.market_maker);
        let reserve_ratio = market_maker
            .get_collateral_token(&config.collateral_token)
            .ok_or(Error::UnknownCollateralToken)?
            .reserve_ratio;
        let to_reserve = mul_div(
            &env,
            mul_div(&env, total_raised, PPM as i128, base)?,
            reserve_ratio as i128,
            PPM as i128,
        )?
        .min(total_raised);
        let to_beneficiary = total_raised - to_reserve;

        let collateral = token::Client::new(&env, &config.collateral_token);
        if to_reserve > 0 {
            collateral.transfer(&this, &config.reserve, &to_reserve);
        }
        if to_beneficiary > 0 {
            collateral.transfer(&this, &config.beneficiary, &to_beneficiary);
        }

        set_closed(&env);
        market_maker.open(&this);

        events::emit_close(
            &env,
            CloseEvent {
                total_raised,
                to_reserve,
                to_beneficiary,
                beneficiary_tokens,
            },
        );
        guard::exit(&env);
        Ok(())
    }

    pub fn reduce_beneficiary_pct(env: Env, caller: Address, ppm: u32) -> Result<(), Error> {
        let mut config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &REDUCE_BENEFICIARY_PCT_ROLE)?;
        if is_closed(&env) {
            return Err(Error::InvalidState);
        }
        if ppm >= config.minting_for_beneficiary_ppm {
            return Err(Error::InvalidConfig);
        }
        config.minting_for_beneficiary_ppm = ppm;
        set_config(&env, &config);
        events::emit_beneficiary_pct(&env, ppm);
        Ok(())
    }

    pub fn contribution_to_tokens(env: Env, amount: i128) -> Result<i128, Error> {
        let config = read_config(&env)?;
        to_tokens(&env, &config, amount)
    }

    // ==================== Queries ====================

    pub fn get_config(env: Env) -> Result<PresaleConfig, Error> {
        read_config(&env)
    }

    pub fn total_raised(env: Env) -> i128 {
        get_total_raised(&env)
    }

    pub fn total_sold(env: Env) -> i128 {
        get_total_sold(&env)
    }

    pub fn contributors_counter(env: Env) -> u32 {
        get_contributors_counter(&env)
    }

    pub fn contribution_of(env: Env, contributor: Address) -> i128 {
        get_contribution(&env, &contributor).unwrap_or(0)
    }

    pub fn open_date(env: Env) -> u64 {
        get_open_date(&env)
    }

    pub fn period(env: Env) -> Result<u64, Error> {
        Ok(read_config(&env)?.period)
    }

    pub fn exchange_rate(env: Env) -> Result<i128, Error> {
        Ok(read_config(&env)?.exchange_rate)
    }

    pub fn minting_for_beneficiary_pct(env: Env) -> Result<u32, Error> {
        Ok(read_config(&env)?.minting_for_beneficiary_ppm)
    }

    pub fn is_closed(env: Env) -> bool {
        crate::storage::is_closed(&env)
    }
}
