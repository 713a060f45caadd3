use crate::types::*;
use soroban_sdk::{Address, Env};

pub fn get_config(env: &Env) -> Option<PresaleConfig> {
    env.storage().instance().get(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &PresaleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_open_date(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::OpenDate)
        .unwrap_or(0)
}

pub fn set_open_date(env: &Env, date: u64) {
    env.storage().instance().set(&DataKey::OpenDate, &date);
}

pub fn is_opened(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Opened)
        .unwrap_or(false)
}

pub fn set_opened(env: &Env) {
    env.storage().instance().set(&DataKey::Opened, &true);
}

pub fn is_closed(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Closed)
        .unwrap_or(false)
}

pub fn set_closed(env: &Env) {
    env.storage().instance().set(&DataKey::Closed, &true);
}

pub fn get_total_raised(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalRaised)
        .unwrap_or(0)
}

pub fn set_total_raised(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TotalRaised, &amount);
}

pub fn get_total_sold(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalSold)
        .unwrap_or(0)
}

pub fn set_total_sold(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TotalSold, &amount);
}

pub fn get_contributors_counter(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::ContributorsCounter)
        .unwrap_or(0)
}

pub fn set_contributors_counter(env: &Env, count: u32) {
    env.storage()
        .instance()
        .set(&DataKey::ContributorsCounter, &count);
}

pub fn get_contribution(env: &Env, contributor: &Address) -> Option<i128> {
    env.storage()
        .persistent()
        .get(&DataKey::Contribution(contributor.clone()))
}

pub fn set_contribution(env: &Env, contributor: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Contribution(contributor.clone()), &amount);
}
