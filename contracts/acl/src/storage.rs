use fundraising_common::Permission;
use soroban_sdk::{contracttype, Address, Env, Symbol};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Permission(Address, Symbol),
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Initialized)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&DataKey::Initialized, &true);
}

pub fn get_permission(env: &Env, app: &Address, role: &Symbol) -> Option<Permission> {
    env.storage()
        .persistent()
        .get(&DataKey::Permission(app.clone(), role.clone()))
}

pub fn set_permission(env: &Env, app: &Address, role: &Symbol, permission: &Permission) {
    env.storage()
        .persistent()
        .set(&DataKey::Permission(app.clone(), role.clone()), permission);
}
