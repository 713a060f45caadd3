use fundraising_common::Entity;
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

const ACL: Symbol = symbol_short!("ACL");

#[derive(Clone)]
#[contracttype]
pub struct SetPermissionEvent {
    pub entity: Entity,
    pub app: Address,
    pub role: Symbol,
    pub allowed: bool,
}

#[derive(Clone)]
#[contracttype]
pub struct ChangePermissionManagerEvent {
    pub app: Address,
    pub role: Symbol,
    pub manager: Address,
}

pub fn emit_set_permission(env: &Env, entity: &Entity, app: &Address, role: &Symbol, allowed: bool) {
    env.events().publish(
        (ACL, symbol_short!("SET_PERM")),
        SetPermissionEvent {
            entity: entity.clone(),
            app: app.clone(),
            role: role.clone(),
            allowed,
        },
    );
}

pub fn emit_change_manager(env: &Env, app: &Address, role: &Symbol, manager: &Address) {
    env.events().publish(
        (ACL, symbol_short!("CHG_MGR")),
        ChangePermissionManagerEvent {
            app: app.clone(),
            role: role.clone(),
            manager: manager.clone(),
        },
    );
}
