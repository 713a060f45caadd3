#![no_std]

#[cfg(test)]
mod test;

use fundraising_common::auth::authorize;
use fundraising_common::roles::APP_MANAGER_ROLE;
use fundraising_common::{Error, Organization};
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, Map, Symbol};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Acl,
    Apps,
}

#[derive(Clone)]
#[contracttype]
pub struct AppRegisteredEvent {
    pub name: Symbol,
    pub app: Address,
}

#[contract]
pub struct KernelContract;

fn read_acl(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Acl)
        .ok_or(Error::NotInitialized)
}

fn read_apps(env: &Env) -> Map<Symbol, Address> {
    env.storage()
        .instance()
        .get(&DataKey::Apps)
        .unwrap_or(Map::new(env))
}

/// Organization root: binds the permission registry and the app directory.
#[contractimpl]
impl KernelContract {
    pub fn initialize(env: Env, acl: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Acl) {
            return Err(Error::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Acl, &acl);
        env.storage()
            .instance()
            .set(&DataKey::Apps, &Map::<Symbol, Address>::new(&env));
        Ok(())
    }

    pub fn has_initialized(env: Env) -> bool {
        env.storage().instance().has(&DataKey::Acl)
    }

    /// Registers `app` under `name`. A name is bound once and never re-pointed.
    pub fn set_app(env: Env, caller: Address, name: Symbol, app: Address) -> Result<(), Error> {
        let acl = read_acl(&env)?;
        authorize(&env, &acl, &caller, &APP_MANAGER_ROLE)?;
        let mut apps = read_apps(&env);
        if apps.contains_key(name.clone()) {
            return Err(Error::AppAlreadyRegistered);
        }
        apps.set(name.clone(), app.clone());
        env.storage().instance().set(&DataKey::Apps, &apps);
        env.events().publish(
            (symbol_short!("KERNEL"), symbol_short!("SET_APP")),
            AppRegisteredEvent { name, app },
        );
        Ok(())
    }

    pub fn get_app(env: Env, name: Symbol) -> Option<Address> {
        read_apps(&env).get(name)
    }

    pub fn acl(env: Env) -> Result<Address, Error> {
        read_acl(&env)
    }

    pub fn organization(env: Env) -> Result<Organization, Error> {
        Ok(Organization {
            kernel: env.current_contract_address(),
            acl: read_acl(&env)?,
            apps: read_apps(&env),
        })
    }
}
