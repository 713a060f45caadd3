#![no_std]

mod events;
mod storage;


use fundraising_common::auth::authorize;
use fundraising_common::roles::{BURN_ROLE, MINT_ROLE};
use fundraising_common::Error;
use soroban_sdk::{contract, contractimpl, contractmeta, Address, Env, String};
use storage::TokenMetadata;

contractmeta!(
    key = "Description",
    val = "Bonded token - minted and burned by the fundraising apps"
);

#[contract]
pub struct BondedToken;

fn read_acl(env: &Env) -> Result<Address, Error> {
    storage::get_acl(env).ok_or(Error::NotInitialized)
}

fn read_metadata(env: &Env) -> Result<TokenMetadata, Error> {
    storage::get_metadata(env).ok_or(Error::NotInitialized)
}

fn move_balance(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    if amount < 0 {
        return Err(Error::InvalidAmount);
    }
    let from_balance = storage::get_balance(env, from);
    if from_balance < amount {
        return Err(Error::InsufficientBalance);
    }
    storage::set_balance(env, from, from_balance - amount);
    let to_balance = storage::get_balance(env, to);
    storage::set_balance(
        env,
        to,
        to_balance.checked_add(amount).ok_or(Error::MathOverflow)?,
    );
    events::emit_transfer(env, from, to, amount);
    Ok(())
}

#[contractimpl]
impl BondedToken {
    pub fn initialize(
        env: Env,
        acl: Address,
        decimal: u32,
        name: String,
        symbol: String,
    ) -> Result<(), Error> {
        if storage::get_acl(&env).is_some() {
            return Err(Error::AlreadyInitialized);
        }
        storage::set_acl(&env, &acl);
        storage::set_metadata(
            &env,
            &TokenMetadata {
                decimal,
                name,
                symbol,
            },
        );
        storage::set_total_supply(&env, 0);
        Ok(())
    }

    pub fn has_initialized(env: Env) -> bool {
        storage::get_acl(&env).is_some()
    }

    // ==================== Token manager ====================

    pub fn mint(env: Env, caller: Address, to: Address, amount: i128) -> Result<(), Error> {
        authorize(&env, &read_acl(&env)?, &caller, &MINT_ROLE)?;
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        let supply = storage::get_total_supply(&env)
            .checked_add(amount)
            .ok_or(Error::MathOverflow)?;
        let balance = storage::get_balance(&env, &to) + amount;
        storage::set_total_supply(&env, supply);
        storage::set_balance(&env, &to, balance);
        events::emit_mint(&env, &to, amount);
        Ok(())
    }

    /// Destroys `amount` of `from`'s balance. Only `caller` signs: holding
    /// `BURN_ROLE` is the authority to burn from any account, and `from` is
    /// never asked to authorize.
    pub fn burn(env: Env, caller: Address, from: Address, amount: i128) -> Result<(), Error> {
        authorize(&env, &read_acl(&env)?, &caller, &BURN_ROLE)?;
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        let balance = storage::get_balance(&env, &from);
        if balance < amount {
            return Err(Error::InsufficientBalance);
        }
        storage::set_balance(&env, &from, balance - amount);
        storage::set_total_supply(&env, storage::get_total_supply(&env) - amount);
        events::emit_burn(&env, &from, amount);
        Ok(())
    }

    // ==================== Holder operations ====================

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        move_balance(&env, &from, &to, amount)
    }

    pub fn approve(env: Env, from: Address, spender: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        storage::set_allowance(&env, &from, &spender, amount);
        events::emit_approve(&env, &from, &spender, amount);
        Ok(())
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        spender.require_auth();
        let allowance = storage::get_allowance(&env, &from, &spender);
        if allowance < amount {
            return Err(Error::InsufficientBalance);
        }
        storage::set_allowance(&env, &from, &spender, allowance - amount);
        move_balance(&env, &from, &to, amount)
    }

    // ==================== Queries ====================

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        storage::get_allowance(&env, &from, &spender)
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        storage::get_balance(&env, &id)
    }

    pub fn total_supply(env: Env) -> i128 {
        storage::get_total_supply(&env)
    }

    pub fn decimals(env: Env) -> Result<u32, Error> {
        Ok(read_metadata(&env)?.decimal)
    }

    pub fn name(env: Env) -> Result<String, Error> {
        Ok(read_metadata(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, Error> {
        Ok(read_metadata(&env)?.symbol)
    }
}
