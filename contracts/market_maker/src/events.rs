use fundraising_common::CollateralTokenConfig;
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::types::Batch;

// Topic pattern: ("MM", symbol_short!("…")).
const MM: Symbol = symbol_short!("MM");

#[derive(Clone)]
#[contracttype]
pub struct CollateralEvent {
    pub collateral: Address,
    pub virtual_supply: i128,
    pub virtual_balance: i128,
    pub reserve_ratio: u32,
    pub slippage: u32,
}

#[derive(Clone)]
#[contracttype]
pub struct NewBatchEvent {
    pub batch_id: u32,
    pub collateral: Address,
    pub supply: i128,
    pub balance: i128,
    pub reserve_ratio: u32,
    pub slippage: u32,
}

#[derive(Clone)]
#[contracttype]
pub struct OrderOpenedEvent {
    pub account: Address,
    pub batch_id: u32,
    pub collateral: Address,
    /// Amount added to the order, net of fees for buys.
    pub value: i128,
    pub fee: i128,
}

#[derive(Clone)]
#[contracttype]
pub struct OrderClaimedEvent {
    pub account: Address,
    pub batch_id: u32,
    pub collateral: Address,
    pub amount: i128,
    pub fee: i128,
}

#[derive(Clone)]
#[contracttype]
pub struct FeesEvent {
    pub buy_fee: u32,
    pub sell_fee: u32,
}

pub fn emit_open(env: &Env) {
    env.events().publish((MM, symbol_short!("OPEN")), true);
}

fn collateral_event(collateral: &Address, config: &CollateralTokenConfig) -> CollateralEvent {
    CollateralEvent {
        collateral: collateral.clone(),
        virtual_supply: config.virtual_supply,
        virtual_balance: config.virtual_balance,
        reserve_ratio: config.reserve_ratio,
        slippage: config.slippage,
    }
}

pub fn emit_add_collateral(env: &Env, collateral: &Address, config: &CollateralTokenConfig) {
    env.events().publish(
        (MM, symbol_short!("ADD_COLL")),
        collateral_event(collateral, config),
    );
}

pub fn emit_update_collateral(env: &Env, collateral: &Address, config: &CollateralTokenConfig) {
    env.events().publish(
        (MM, symbol_short!("UPD_COLL")),
        collateral_event(collateral, config),
    );
}

pub fn emit_remove_collateral(env: &Env, collateral: &Address) {
    env.events()
        .publish((MM, symbol_short!("REM_COLL")), collateral.clone());
}

pub fn emit_new_batch(env: &Env, batch: &Batch) {
    env.events().publish(
        (MM, symbol_short!("NEW_BATCH")),
        NewBatchEvent {
            batch_id: batch.id,
            collateral: batch.collateral.clone(),
            supply: batch.supply,
            balance: batch.balance,
            reserve_ratio: batch.reserve_ratio,
            slippage: batch.slippage,
        },
    );
}

pub fn emit_buy_opened(env: &Env, event: OrderOpenedEvent) {
    env.events().publish((MM, symbol_short!("BUY_OPEN")), event);
}

pub fn emit_sell_opened(env: &Env, event: OrderOpenedEvent) {
    env.events().publish((MM, symbol_short!("SELL_OPEN")), event);
}

pub fn emit_buy_claimed(env: &Env, event: OrderClaimedEvent) {
    env.events().publish((MM, symbol_short!("BUY_CLAIM")), event);
}

pub fn emit_sell_claimed(env: &Env, event: OrderClaimedEvent) {
    env.events()
        .publish((MM, Symbol::new(env, "SELL_CLAIM")), event);
}

pub fn emit_update_beneficiary(env: &Env, beneficiary: &Address) {
    env.events()
        .publish((MM, symbol_short!("UPD_BEN")), beneficiary.clone());
}

pub fn emit_update_fees(env: &Env, buy_fee: u32, sell_fee: u32) {
    env.events()
        .publish((MM, symbol_short!("UPD_FEES")), FeesEvent { buy_fee, sell_fee });
}
