#![no_std]

mod events;
mod storage;


use fundraising_common::roles::CREATE_PERMISSIONS_ROLE;
use fundraising_common::{Entity, Error, Permission};
use soroban_sdk::{contract, contractimpl, contractmeta, Address, Env, Symbol, Vec};

contractmeta!(
    key = "Description",
    val = "Permission registry for the fundraising apps"
);

#[contract]
pub struct AclContract;

// ==================== Helpers ====================

fn require_initialized(env: &Env) -> Result<(), Error> {
    if !storage::is_initialized(env) {
        return Err(Error::NotInitialized);
    }
    Ok(())
}

fn holds(permission: &Permission, who: &Address) -> bool {
    permission.grantees.iter().any(|g| match g {
        Entity::Any => true,
        Entity::Account(account) => account == *who,
    })
}

/// Loads `(app, role)` and checks that `caller` is its manager.
fn require_manager(
    env: &Env,
    caller: &Address,
    app: &Address,
    role: &Symbol,
) -> Result<Permission, Error> {
    require_initialized(env)?;
    caller.require_auth();
    let permission = storage::get_permission(env, app, role).ok_or(Error::PermissionNotFound)?;
    if permission.manager != *caller {
        return Err(Error::Unauthorized);
    }
    Ok(permission)
}

fn create(env: &Env, entity: Entity, app: &Address, role: &Symbol, manager: &Address) {
    let mut grantees = Vec::new(env);
    grantees.push_back(entity.clone());
    storage::set_permission(
        env,
        app,
        role,
        &Permission {
            manager: manager.clone(),
            grantees,
        },
    );
    events::emit_set_permission(env, &entity, app, role, true);
    events::emit_change_manager(env, app, role, manager);
}

#[contractimpl]
impl AclContract {
    // ==================== Lifecycle ====================

    /// Creates `CREATE_PERMISSIONS_ROLE` on the registry itself, held and
    /// managed by `permissions_creator`.
    pub fn initialize(env: Env, permissions_creator: Address) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        storage::set_initialized(&env);
        let this = env.current_contract_address();
        create(
            &env,
            Entity::Account(permissions_creator.clone()),
            &this,
            &CREATE_PERMISSIONS_ROLE,
            &permissions_creator,
        );
        Ok(())
    }

    pub fn has_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    // ==================== Mutations ====================

    pub fn create_permission(
        env: Env,
        caller: Address,
        entity: Entity,
        app: Address,
        role: Symbol,
        manager: Address,
    ) -> Result<(), Error> {
        require_initialized(&env)?;
        caller.require_auth();
        let this = env.current_contract_address();
        let allowed = storage::get_permission(&env, &this, &CREATE_PERMISSIONS_ROLE)
            .map(|p| holds(&p, &caller))
            .unwrap_or(false);
        if !allowed {
            return Err(Error::Unauthorized);
        }
        if storage::get_permission(&env, &app, &role).is_some() {
            return Err(Error::PermissionExists);
        }
        create(&env, entity, &app, &role, &manager);
        Ok(())
    }

    pub fn grant_permission(
        env: Env,
        caller: Address,
        entity: Entity,
        app: Address,
        role: Symbol,
    ) -> Result<(), Error> {
        let mut permission = require_manager(&env, &caller, &app, &role)?;
        if permission.grantees.contains(&entity) {
            return Err(Error::PermissionExists);
        }
        permission.grantees.push_back(entity.clone());
        storage::set_permission(&env, &app, &role, &permission);
        events::emit_set_permission(&env, &entity, &app, &role, true);
        Ok(())
    }

    pub fn revoke_permission(
        env: Env,
        caller: Address,
        entity: Entity,
        app: Address,
        role: Symbol,
    ) -> Result<(), Error> {
        let mut permission = require_manager(&env, &caller, &app, &role)?;
        let index = permission
            .grantees
            .first_index_of(&entity)
            .ok_or(Error::PermissionNotFound)?;
        permission.grantees.remove(index);
        storage::set_permission(&env, &app, &role, &permission);
        events::emit_set_permission(&env, &entity, &app, &role, false);
        Ok(())
    }

    pub fn set_permission_manager(
        env: Env,
        caller: Address,
        new_manager: Address,
        app: Address,
        role: Symbol,
    ) -> Result<(), Error> {
        let mut permission = require_manager(&env, &caller, &app, &role)?;
        permission.manager = new_manager.clone();
        storage::set_permission(&env, &app, &role, &permission);
        events::emit_change_manager(&env, &app, &role, &new_manager);
        Ok(())
    }

    // ==================== Queries ====================

    pub fn has_permission(env: Env, who: Address, app: Address, role: Symbol) -> bool {
        storage::get_permission(&env, &app, &role)
            .map(|p| holds(&p, &who))
            .unwrap_or(false)
    }

    pub fn get_permission_manager(env: Env, app: Address, role: Symbol) -> Option<Address> {
        storage::get_permission(&env, &app, &role).map(|p| p.manager)
    }

    pub fn get_permission(env: Env, app: Address, role: Symbol) -> Option<Permission> {
        storage::get_permission(&env, &app, &role)
    }
}
