use fundraising_common::CollateralTokenConfig;
use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Batch, MarketMakerConfig, Order};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    IsOpen,
    TokensToBeMinted,
    Collateral(Address),
    CollateralToBeClaimed(Address),
    OutstandingOrders(Address),
    LatestBatch(Address),
    Batch(u32, Address),
    BuyOrder(u32, Address, Address),
    SellOrder(u32, Address, Address),
}

// ==================== Instance ====================

pub fn get_config(env: &Env) -> Option<MarketMakerConfig> {
    env.storage().instance().get(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &MarketMakerConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn is_open(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::IsOpen)
        .unwrap_or(false)
}

pub fn set_open(env: &Env) {
    env.storage().instance().set(&DataKey::IsOpen, &true);
}

pub fn get_tokens_to_be_minted(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TokensToBeMinted)
        .unwrap_or(0)
}

pub fn set_tokens_to_be_minted(env: &Env, amount: i128) {
    env.storage()
        .instance()
        .set(&DataKey::TokensToBeMinted, &amount);
}

// ==================== Per collateral ====================

pub fn get_collateral(env: &Env, collateral: &Address) -> Option<CollateralTokenConfig> {
    env.storage()
        .persistent()
        .get(&DataKey::Collateral(collateral.clone()))
}

pub fn set_collateral(env: &Env, collateral: &Address, config: &CollateralTokenConfig) {
    env.storage()
        .persistent()
        .set(&DataKey::Collateral(collateral.clone()), config);
}

pub fn remove_collateral(env: &Env, collateral: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Collateral(collateral.clone()));
}

pub fn get_collateral_to_be_claimed(env: &Env, collateral: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::CollateralToBeClaimed(collateral.clone()))
        .unwrap_or(0)
}

pub fn set_collateral_to_be_claimed(env: &Env, collateral: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::CollateralToBeClaimed(collateral.clone()), &amount);
}

pub fn get_outstanding_orders(env: &Env, collateral: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::OutstandingOrders(collateral.clone()))
        .unwrap_or(0)
}

pub fn set_outstanding_orders(env: &Env, collateral: &Address, count: u32) {
    env.storage()
        .persistent()
        .set(&DataKey::OutstandingOrders(collateral.clone()), &count);
}

pub fn get_latest_batch(env: &Env, collateral: &Address) -> Option<u32> {
    env.storage()
        .persistent()
        .get(&DataKey::LatestBatch(collateral.clone()))
}

pub fn set_latest_batch(env: &Env, collateral: &Address, batch_id: u32) {
    env.storage()
        .persistent()
        .set(&DataKey::LatestBatch(collateral.clone()), &batch_id);
}

// ==================== Batches and orders ====================

pub fn get_batch(env: &Env, batch_id: u32, collateral: &Address) -> Option<Batch> {
    env.storage()
        .persistent()
        .get(&DataKey::Batch(batch_id, collateral.clone()))
}

pub fn set_batch(env: &Env, batch: &Batch) {
    env.storage()
        .persistent()
        .set(&DataKey::Batch(batch.id, batch.collateral.clone()), batch);
}

pub fn get_buy_order(
    env: &Env,
    batch_id: u32,
    collateral: &Address,
    account: &Address,
) -> Option<Order> {
    env.storage().persistent().get(&DataKey::BuyOrder(
        batch_id,
        collateral.clone(),
        account.clone(),
    ))
}

pub fn set_buy_order(env: &Env, order: &Order) {
    env.storage().persistent().set(
        &DataKey::BuyOrder(order.batch_id, order.collateral.clone(), order.account.clone()),
        order,
    );
}

pub fn get_sell_order(
    env: &Env,
    batch_id: u32,
    collateral: &Address,
    account: &Address,
) -> Option<Order> {
    env.storage().persistent().get(&DataKey::SellOrder(
        batch_id,
        collateral.clone(),
        account.clone(),
    ))
}

pub fn set_sell_order(env: &Env, order: &Order) {
    env.storage().persistent().set(
        &DataKey::SellOrder(order.batch_id, order.collateral.clone(), order.account.clone()),
        order,
    );
}
