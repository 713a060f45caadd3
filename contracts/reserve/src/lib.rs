#![no_std]


use fundraising_common::auth::authorize;
use fundraising_common::roles::{ADD_PROTECTED_TOKEN_ROLE, TRANSFER_ROLE};
use fundraising_common::{guard, Error};
use soroban_sdk::{
    contract, contractimpl, contractmeta, contracttype, symbol_short, token, Address, Env, Symbol,
    Vec,
};

contractmeta!(
    key = "Description",
    val = "Fundraising reserve - custody of collateral"
);

const RESERVE: Symbol = symbol_short!("RESERVE");

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Acl,
    ProtectedTokens,
}

#[derive(Clone)]
#[contracttype]
pub struct VaultTransferEvent {
    pub token: Address,
    pub to: Address,
    pub amount: i128,
}

#[contract]
pub struct ReserveContract;

fn read_acl(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Acl)
        .ok_or(Error::NotInitialized)
}

fn read_protected(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::ProtectedTokens)
        .unwrap_or(Vec::new(env))
}

#[contractimpl]
impl ReserveContract {
    pub fn initialize(env: Env, acl: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Acl) {
            return Err(Error::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Acl, &acl);
        Ok(())
    }

    pub fn has_initialized(env: Env) -> bool {
        env.storage().instance().has(&DataKey::Acl)
    }

    /// Pays `amount` of `token` out of the reserve. The only way collateral leaves.
    pub fn transfer(
        env: Env,
        caller: Address,
        token: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        authorize(&env, &read_acl(&env)?, &caller, &TRANSFER_ROLE)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        guard::enter(&env)?;

        let this = env.current_contract_address();
        let client = token::Client::new(&env, &token);
        if client.balance(&this) < amount {
            return Err(Error::InsufficientBalance);
        }
        client.transfer(&this, &to, &amount);

        env.events().publish(
            (RESERVE, symbol_short!("TRANSFER")),
            VaultTransferEvent { token, to, amount },
        );
        guard::exit(&env);
        Ok(())
    }

    pub fn add_protected_token(env: Env, caller: Address, token: Address) -> Result<(), Error> {
        authorize(&env, &read_acl(&env)?, &caller, &ADD_PROTECTED_TOKEN_ROLE)?;
        let mut tokens = read_protected(&env);
        if tokens.contains(&token) {
            return Err(Error::InvalidState);
        }
        tokens.push_back(token.clone());
        env.storage()
            .instance()
            .set(&DataKey::ProtectedTokens, &tokens);
        env.events()
            .publish((RESERVE, symbol_short!("PROTECT")), token);
        Ok(())
    }

    pub fn is_protected(env: Env, token: Address) -> bool {
        read_protected(&env).contains(&token)
    }

    pub fn protected_tokens(env: Env) -> Vec<Address> {
        read_protected(&env)
    }

    pub fn balance(env: Env, token: Address) -> i128 {
        token::Client::new(&env, &token).balance(&env.current_contract_address())
    }
}
