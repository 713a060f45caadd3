#![no_std]
#![allow(clippy::too_many_arguments)]

mod events;
mod storage;
mod types;

#[cfg(test)]
mod test;

pub use types::{Batch, MarketMakerConfig, Order};

use events::{OrderClaimedEvent, OrderOpenedEvent};
use fundraising_common::auth::authorize;
use fundraising_common::interfaces::{BondedTokenClient, PriceFormulaClient, ReserveClient};
use fundraising_common::math::{apply_ppm, mul_div};
use fundraising_common::roles::*;
use fundraising_common::{guard, CollateralTokenConfig, Error, PPM};
use soroban_sdk::{contract, contractimpl, contractmeta, token, Address, Env};

contractmeta!(
    key = "Description",
    val = "Batched bonding-curve market maker"
);

#[contract]
pub struct MarketMaker;

// ==================== Helpers ====================

fn read_config(env: &Env) -> Result<MarketMakerConfig, Error> {
    storage::get_config(env).ok_or(Error::NotInitialized)
}

fn validate_fees(buy_fee: u32, sell_fee: u32) -> Result<(), Error> {
    if buy_fee >= PPM || sell_fee >= PPM {
        return Err(Error::InvalidConfig);
    }
    Ok(())
}

fn collateral_config(
    virtual_supply: i128,
    virtual_balance: i128,
    reserve_ratio: u32,
    slippage: u32,
) -> Result<CollateralTokenConfig, Error> {
    if reserve_ratio == 0 || reserve_ratio > PPM {
        return Err(Error::InvalidConfig);
    }
    if virtual_supply < 0 || virtual_balance < 0 {
        return Err(Error::InvalidAmount);
    }
    Ok(CollateralTokenConfig {
        whitelisted: true,
        virtual_supply,
        virtual_balance,
        reserve_ratio,
        slippage,
    })
}

fn require_trading(env: &Env, collateral: &Address, amount: i128) -> Result<(), Error> {
    if !storage::is_open(env) {
        return Err(Error::InvalidState);
    }
    match storage::get_collateral(env, collateral) {
        Some(config) if config.whitelisted => {}
        _ => return Err(Error::UnknownCollateralToken),
    }
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    Ok(())
}

fn batch_id_at(sequence: u32, batch_blocks: u32) -> u32 {
    (sequence / batch_blocks) * batch_blocks
}

/// Computes the batch totals against its frozen snapshot. Runs once per batch.
fn settle(env: &Env, config: &MarketMakerConfig, batch: &mut Batch) -> Result<(), Error> {
    if batch.settled {
        return Ok(());
    }
    let formula = PriceFormulaClient::new(env, &config.formula);

    if batch.total_buy_spend > 0 {
        batch.total_buy_return = formula.calculate_purchase_return(
            &batch.supply,
            &batch.balance,
            &batch.reserve_ratio,
            &batch.total_buy_spend,
        );
        let pending = storage::get_tokens_to_be_minted(env) + batch.total_buy_return;
        storage::set_tokens_to_be_minted(env, pending);
    }
    if batch.total_sell_spend > 0 {
        batch.total_sell_return = formula.calculate_sale_return(
            &batch.supply,
            &batch.balance,
            &batch.reserve_ratio,
            &batch.total_sell_spend,
        );
        let pending =
            storage::get_collateral_to_be_claimed(env, &batch.collateral) + batch.total_sell_return;
        storage::set_collateral_to_be_claimed(env, &batch.collateral, pending);
    }

    batch.settled = true;
    storage::set_batch(env, batch);
    Ok(())
}

/// Returns the batch covering the current ledger sequence, opening it with a
/// fresh snapshot if needed. Opening a batch settles the previous one.
fn current_batch(
    env: &Env,
    config: &MarketMakerConfig,
    collateral: &Address,
) -> Result<Batch, Error> {
    let id = batch_id_at(env.ledger().sequence(), config.batch_blocks);
    if let Some(batch) = storage::get_batch(env, id, collateral) {
        return Ok(batch);
    }

    if let Some(latest) = storage::get_latest_batch(env, collateral) {
        if let Some(mut previous) = storage::get_batch(env, latest, collateral) {
            settle(env, config, &mut previous)?;
        }
    }

    let collateral_config =
        storage::get_collateral(env, collateral).ok_or(Error::UnknownCollateralToken)?;
    let supply = BondedTokenClient::new(env, &config.bonded_token).total_supply()
        + collateral_config.virtual_supply
        + storage::get_tokens_to_be_minted(env);
    let balance = ReserveClient::new(env, &config.reserve).balance(collateral)
        + collateral_config.virtual_balance
        - storage::get_collateral_to_be_claimed(env, collateral);

    let batch = Batch {
        id,
        collateral: collateral.clone(),
        start: id,
        end: id + config.batch_blocks,
        supply,
        balance,
        reserve_ratio: collateral_config.reserve_ratio,
        slippage: collateral_config.slippage,
        total_buy_spend: 0,
        total_buy_return: 0,
        total_sell_spend: 0,
        total_sell_return: 0,
        buyers: 0,
        sellers: 0,
        claimed_buys: 0,
        claimed_sells: 0,
        claimed_buy_return: 0,
        claimed_sell_return: 0,
        settled: false,
    };
    storage::set_batch(env, &batch);
    storage::set_latest_batch(env, collateral, id);
    events::emit_new_batch(env, &batch);
    Ok(batch)
}

/// Fails when the curve result for the batch totals drifts from the snapshot
/// spot-price result by more than the batch slippage.
fn check_slippage(env: &Env, static_return: i128, curve_return: i128, slippage: u32) -> Result<(), Error> {
    if static_return <= 0 || curve_return >= static_return {
        return Ok(());
    }
    let slip = mul_div(env, static_return - curve_return, PPM as i128, static_return)?;
    if slip > slippage as i128 {
        return Err(Error::SlippageExceeded);
    }
    Ok(())
}

/// A batch whose snapshot has no supply or no balance cannot be priced, so it
/// takes no orders.
fn require_priced(batch: &Batch) -> Result<(), Error> {
    if batch.supply <= 0 || batch.balance <= 0 {
        return Err(Error::InvalidState);
    }
    Ok(())
}

fn check_buy_slippage(env: &Env, config: &MarketMakerConfig, batch: &Batch) -> Result<(), Error> {
    require_priced(batch)?;
    let spend = batch.total_buy_spend;
    let curve = PriceFormulaClient::new(env, &config.formula).calculate_purchase_return(
        &batch.supply,
        &batch.balance,
        &batch.reserve_ratio,
        &spend,
    );
    // tokens at the snapshot spot price: spend * supply * ratio / (balance * PPM)
    let at_spot = mul_div(
        env,
        mul_div(env, spend, batch.supply, batch.balance)?,
        batch.reserve_ratio as i128,
        PPM as i128,
    )?;
    check_slippage(env, at_spot, curve, batch.slippage)
}

fn check_sell_slippage(env: &Env, config: &MarketMakerConfig, batch: &Batch) -> Result<(), Error> {
    require_priced(batch)?;
    let spend = batch.total_sell_spend;
    let curve = PriceFormulaClient::new(env, &config.formula).calculate_sale_return(
        &batch.supply,
        &batch.balance,
        &batch.reserve_ratio,
        &spend,
    );
    if curve > batch.balance {
        return Err(Error::InsufficientBalance);
    }
    // collateral at the snapshot spot price: spend * balance * PPM / (supply * ratio)
    let at_spot = mul_div(
        env,
        mul_div(env, spend, batch.balance, batch.supply)?,
        PPM as i128,
        batch.reserve_ratio as i128,
    )?;
    check_slippage(env, at_spot, curve, batch.slippage)
}

/// Loads a closed batch and settles it if this is its first claim.
fn claimable_batch(
    env: &Env,
    config: &MarketMakerConfig,
    batch_id: u32,
    collateral: &Address,
) -> Result<Batch, Error> {
    let mut batch = storage::get_batch(env, batch_id, collateral).ok_or(Error::BatchNotFound)?;
    if env.ledger().sequence() < batch.end {
        return Err(Error::BatchNotClosed);
    }
    settle(env, config, &mut batch)?;
    Ok(batch)
}

fn release_order(env: &Env, collateral: &Address) {
    let outstanding = storage::get_outstanding_orders(env, collateral);
    storage::set_outstanding_orders(env, collateral, outstanding.saturating_sub(1));
}

fn track_new_order(env: &Env, collateral: &Address) {
    let outstanding = storage::get_outstanding_orders(env, collateral);
    storage::set_outstanding_orders(env, collateral, outstanding + 1);
}

#[contractimpl]
impl MarketMaker {
    // ==================== Lifecycle ====================

    pub fn initialize(
        env: Env,
        acl: Address,
        controller: Address,
        bonded_token: Address,
        formula: Address,
        reserve: Address,
        beneficiary: Address,
        batch_blocks: u32,
        buy_fee: u32,
        sell_fee: u32,
    ) -> Result<(), Error> {
        if storage::get_config(&env).is_some() {
            return Err(Error::AlreadyInitialized);
        }
        if batch_blocks == 0 {
            return Err(Error::InvalidConfig);
        }
        validate_fees(buy_fee, sell_fee)?;
        storage::set_config(
            &env,
            &MarketMakerConfig {
                acl,
                controller,
                bonded_token,
                formula,
                reserve,
                beneficiary,
                batch_blocks,
                buy_fee,
                sell_fee,
            },
        );
        Ok(())
    }

    pub fn has_initialized(env: Env) -> bool {
        storage::get_config(&env).is_some()
    }

    pub fn open(env: Env, caller: Address) -> Result<(), Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &OPEN_ROLE)?;
        if storage::is_open(&env) {
            return Err(Error::InvalidState);
        }
        storage::set_open(&env);
        events::emit_open(&env);
        Ok(())
    }

    // ==================== Governance ====================

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
        if storage::get_collateral(&env, &collateral).is_some() {
            return Err(Error::CollateralAlreadyWhitelisted);
        }
        let entry = collateral_config(virtual_supply, virtual_balance, reserve_ratio, slippage)?;
        storage::set_collateral(&env, &collateral, &entry);
        events::emit_add_collateral(&env, &collateral, &entry);
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
        if storage::get_collateral(&env, &collateral).is_none() {
            return Err(Error::UnknownCollateralToken);
        }
        let entry = collateral_config(virtual_supply, virtual_balance, reserve_ratio, slippage)?;
        storage::set_collateral(&env, &collateral, &entry);
        events::emit_update_collateral(&env, &collateral, &entry);
        Ok(())
    }

    /// Delists `collateral` once every order for it is claimed.
    ///
    /// A batch only exists in a block range where an order was opened, and
    /// its orders stay unclaimed until the range ends, so a token can never be
    /// removed while its current batch is live. A re-added token snapshots its
    /// new parameters in the next batch.
    pub fn remove_collateral_token(
        env: Env,
        caller: Address,
        collateral: Address,
    ) -> Result<(), Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &REMOVE_COLLATERAL_TOKEN_ROLE)?;
        if storage::get_collateral(&env, &collateral).is_none() {
            return Err(Error::UnknownCollateralToken);
        }
        if storage::get_outstanding_orders(&env, &collateral) > 0 {
            return Err(Error::PendingOrders);
        }
        storage::remove_collateral(&env, &collateral);
        events::emit_remove_collateral(&env, &collateral);
        Ok(())
    }

    pub fn update_beneficiary(env: Env, caller: Address, beneficiary: Address) -> Result<(), Error> {
        let mut config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &UPDATE_BENEFICIARY_ROLE)?;
        config.beneficiary = beneficiary.clone();
        storage::set_config(&env, &config);
        events::emit_update_beneficiary(&env, &beneficiary);
        Ok(())
    }

    pub fn update_fees(env: Env, caller: Address, buy_fee: u32, sell_fee: u32) -> Result<(), Error> {
        let mut config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &UPDATE_FEES_ROLE)?;
        validate_fees(buy_fee, sell_fee)?;
        config.buy_fee = buy_fee;
        config.sell_fee = sell_fee;
        storage::set_config(&env, &config);
        events::emit_update_fees(&env, buy_fee, sell_fee);
        Ok(())
    }

    // ==================== Orders ====================

    /// Pulls `amount` collateral from `buyer` into the current batch and
    /// returns the batch id. The buy fee goes to the beneficiary right away.
    pub fn open_buy_order(
        env: Env,
        caller: Address,
        buyer: Address,
        collateral: Address,
        amount: i128,
    ) -> Result<u32, Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &OPEN_BUY_ORDER_ROLE)?;
        require_trading(&env, &collateral, amount)?;
        guard::enter(&env)?;

        let fee = apply_ppm(&env, amount, config.buy_fee)?;
        let value = amount - fee;
        if value <= 0 {
            return Err(Error::InvalidAmount);
        }

        let mut batch = current_batch(&env, &config, &collateral)?;
        let mut order = match storage::get_buy_order(&env, batch.id, &collateral, &buyer) {
            Some(order) => order,
            None => {
                batch.buyers += 1;
                track_new_order(&env, &collateral);
                Order {
                    batch_id: batch.id,
                    collateral: collateral.clone(),
                    account: buyer.clone(),
                    amount: 0,
                    claimed: false,
                }
            }
        };
        order.amount += value;
        batch.total_buy_spend += value;
        check_buy_slippage(&env, &config, &batch)?;

        let token = token::Client::new(&env, &collateral);
        if fee > 0 {
            token.transfer(&buyer, &config.beneficiary, &fee);
        }
        token.transfer(&buyer, &config.reserve, &value);

        storage::set_batch(&env, &batch);
        storage::set_buy_order(&env, &order);
        events::emit_buy_opened(
            &env,
            OrderOpenedEvent {
                account: buyer,
                batch_id: batch.id,
                collateral,
                value,
                fee,
            },
        );
        guard::exit(&env);
        Ok(batch.id)
    }

    /// Burns `amount` bonded tokens from `seller` into the current batch and
    /// returns the batch id.
    pub fn open_sell_order(
        env: Env,
        caller: Address,
        seller: Address,
        collateral: Address,
        amount: i128,
    ) -> Result<u32, Error> {
        let config = read_config(&env)?;
        authorize(&env, &config.acl, &caller, &OPEN_SELL_ORDER_ROLE)?;
        require_trading(&env, &collateral, amount)?;
        guard::enter(&env)?;

        let mut batch = current_batch(&env, &config, &collateral)?;
        let mut order = match storage::get_sell_order(&env, batch.id, &collateral, &seller) {
            Some(order) => order,
            None => {
                batch.sellers += 1;
                track_new_order(&env, &collateral);
                Order {
                    batch_id: batch.id,
                    collateral: collateral.clone(),
                    account: seller.clone(),
                    amount: 0,
                    claimed: false,
                }
            }
        };
        order.amount += amount;
        batch.total_sell_spend += amount;
        check_sell_slippage(&env, &config, &batch)?;

        BondedTokenClient::new(&env, &config.bonded_token).burn(
            &env.current_contract_address(),
            &seller,
            &amount,
        );

        storage::set_batch(&env, &batch);
        storage::set_sell_order(&env, &order);
        events::emit_sell_opened(
            &env,
            OrderOpenedEvent {
                account: seller,
                batch_id: batch.id,
                collateral,
                value: amount,
                fee: 0,
            },
        );
        guard::exit(&env);
        Ok(batch.id)
    }

    /// Mints the buyer's share of a closed batch. Anyone may trigger it.
    pub fn claim_buy_order(
        env: Env,
        buyer: Address,
        batch_id: u32,
        collateral: Address,
    ) -> Result<i128, Error> {
        let config = read_config(&env)?;
        guard::enter(&env)?;
        let mut batch = claimable_batch(&env, &config, batch_id, &collateral)?;
        let mut order = storage::get_buy_order(&env, batch_id, &collateral, &buyer)
            .ok_or(Error::OrderNotFound)?;
        if order.claimed {
            return Err(Error::AlreadyClaimed);
        }

        let tokens = mul_div(
            &env,
            order.amount,
            batch.total_buy_return,
            batch.total_buy_spend,
        )?;
        batch.claimed_buys += 1;
        batch.claimed_buy_return += tokens;
        let mut released = tokens;
        if batch.claimed_buys == batch.buyers {
            // last buyer releases the rounding dust
            released += batch.total_buy_return - batch.claimed_buy_return;
        }
        storage::set_tokens_to_be_minted(&env, storage::get_tokens_to_be_minted(&env) - released);

        order.claimed = true;
        storage::set_buy_order(&env, &order);
        storage::set_batch(&env, &batch);
        release_order(&env, &collateral);

        if tokens > 0 {
            BondedTokenClient::new(&env, &config.bonded_token).mint(
                &env.current_contract_address(),
                &buyer,
                &tokens,
            );
        }
        events::emit_buy_claimed(
            &env,
            OrderClaimedEvent {
                account: buyer,
                batch_id,
                collateral,
                amount: tokens,
                fee: 0,
            },
        );
        guard::exit(&env);
        Ok(tokens)
    }

    /// Pays the seller's share of a closed batch from the reserve, minus the
    /// sell fee. Anyone may trigger it. Returns the net amount paid.
    pub fn claim_sell_order(
        env: Env,
        seller: Address,
        batch_id: u32,
        collateral: Address,
    ) -> Result<i128, Error> {
        let config = read_config(&env)?;
        guard::enter(&env)?;
        let mut batch = claimable_batch(&env, &config, batch_id, &collateral)?;
        let mut order = storage::get_sell_order(&env, batch_id, &collateral, &seller)
            .ok_or(Error::OrderNotFound)?;
        if order.claimed {
            return Err(Error::AlreadyClaimed);
        }

        let gross = mul_div(
            &env,
            order.amount,
            batch.total_sell_return,
            batch.total_sell_spend,
        )?;
        let fee = apply_ppm(&env, gross, config.sell_fee)?;
        let net = gross - fee;

        batch.claimed_sells += 1;
        batch.claimed_sell_return += gross;
        let mut released = gross;
        if batch.claimed_sells == batch.sellers {
            released += batch.total_sell_return - batch.claimed_sell_return;
        }
        let pending = storage::get_collateral_to_be_claimed(&env, &collateral) - released;
        storage::set_collateral_to_be_claimed(&env, &collateral, pending);

        order.claimed = true;
        storage::set_sell_order(&env, &order);
        storage::set_batch(&env, &batch);
        release_order(&env, &collateral);

        let reserve = ReserveClient::new(&env, &config.reserve);
        let this = env.current_contract_address();
        if net > 0 {
            reserve.transfer(&this, &collateral, &seller, &net);
        }
        if fee > 0 {
            reserve.transfer(&this, &collateral, &config.beneficiary, &fee);
        }
        events::emit_sell_claimed(
            &env,
            OrderClaimedEvent {
                account: seller,
                batch_id,
                collateral,
                amount: net,
                fee,
            },
        );
        guard::exit(&env);
        Ok(net)
    }

    // ==================== Queries ====================

    pub fn get_config(env: Env) -> Result<MarketMakerConfig, Error> {
        read_config(&env)
    }

    pub fn is_open(env: Env) -> bool {
        storage::is_open(&env)
    }

    pub fn current_batch_id(env: Env) -> Result<u32, Error> {
        let config = read_config(&env)?;
        Ok(batch_id_at(env.ledger().sequence(), config.batch_blocks))
    }

    pub fn get_batch(env: Env, batch_id: u32, collateral: Address) -> Option<Batch> {
        storage::get_batch(&env, batch_id, &collateral)
    }

    pub fn get_buy_order(
        env: Env,
        batch_id: u32,
        collateral: Address,
        buyer: Address,
    ) -> Option<Order> {
        storage::get_buy_order(&env, batch_id, &collateral, &buyer)
    }

    pub fn get_sell_order(
        env: Env,
        batch_id: u32,
        collateral: Address,
        seller: Address,
    ) -> Option<Order> {
        storage::get_sell_order(&env, batch_id, &collateral, &seller)
    }

    pub fn get_collateral_token(env: Env, collateral: Address) -> Option<CollateralTokenConfig> {
        storage::get_collateral(&env, &collateral)
    }

    pub fn tokens_to_be_minted(env: Env) -> i128 {
        storage::get_tokens_to_be_minted(&env)
    }

    pub fn collateral_to_be_claimed(env: Env, collateral: Address) -> i128 {
        storage::get_collateral_to_be_claimed(&env, &collateral)
    }

    pub fn outstanding_orders(env: Env, collateral: Address) -> u32 {
        storage::get_outstanding_orders(&env, &collateral)
    }
}
