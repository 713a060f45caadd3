//! Client traits for contracts that are called across contract boundaries.

use soroban_sdk::{contractclient, Address, Env, Symbol};

use crate::{CollateralTokenConfig, Entity, Error, Permission, PresaleState};

#[contractclient(name = "AclClient")]
pub trait AclInterface {
    fn has_permission(env: Env, who: Address, app: Address, role: Symbol) -> bool;
    fn get_permission_manager(env: Env, app: Address, role: Symbol) -> Option<Address>;
    fn get_permission(env: Env, app: Address, role: Symbol) -> Option<Permission>;
    fn create_permission(
        env: Env,
        caller: Address,
        entity: Entity,
        app: Address,
        role: Symbol,
        manager: Address,
    ) -> Result<(), Error>;
    fn grant_permission(
        env: Env,
        caller: Address,
        entity: Entity,
        app: Address,
        role: Symbol,
    ) -> Result<(), Error>;
    fn revoke_permission(
        env: Env,
        caller: Address,
        entity: Entity,
        app: Address,
        role: Symbol,
    ) -> Result<(), Error>;
    fn set_permission_manager(
        env: Env,
        caller: Address,
        new_manager: Address,
        app: Address,
        role: Symbol,
    ) -> Result<(), Error>;
}

#[contractclient(name = "KernelClient")]
pub trait KernelInterface {
    fn acl(env: Env) -> Result<Address, Error>;
    fn get_app(env: Env, name: Symbol) -> Option<Address>;
    fn set_app(env: Env, caller: Address, name: Symbol, app: Address) -> Result<(), Error>;
}

#[contractclient(name = "PriceFormulaClient")]
pub trait PriceFormulaInterface {
    fn calculate_purchase_return(
        env: Env,
        supply: i128,
        balance: i128,
        reserve_ratio: u32,
        amount: i128,
    ) -> Result<i128, Error>;
    fn calculate_sale_return(
        env: Env,
        supply: i128,
        balance: i128,
        reserve_ratio: u32,
        amount: i128,
    ) -> Result<i128, Error>;
}

#[contractclient(name = "BondedTokenClient")]
pub trait BondedTokenInterface {
    fn mint(env: Env, caller: Address, to: Address, amount: i128) -> Result<(), Error>;
    fn burn(env: Env, caller: Address, from: Address, amount: i128) -> Result<(), Error>;
    fn balance(env: Env, id: Address) -> i128;
    fn total_supply(env: Env) -> i128;
}

#[contractclient(name = "ReserveClient")]
pub trait ReserveInterface {
    fn transfer(
        env: Env,
        caller: Address,
        token: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error>;
    fn add_protected_token(env: Env, caller: Address, token: Address) -> Result<(), Error>;
    fn is_protected(env: Env, token: Address) -> bool;
    fn balance(env: Env, token: Address) -> i128;
}

#[contractclient(name = "PresaleClient")]
pub trait PresaleInterface {
    fn state(env: Env) -> Result<PresaleState, Error>;
    fn open_presale(env: Env, caller: Address) -> Result<(), Error>;
    fn contribute(env: Env, caller: Address, contributor: Address, amount: i128)
        -> Result<(), Error>;
    fn close_presale(env: Env) -> Result<(), Error>;
}

#[contractclient(name = "MarketMakerClient")]
pub trait MarketMakerInterface {
    fn open(env: Env, caller: Address) -> Result<(), Error>;
    fn add_collateral_token(
        env: Env,
        caller: Address,
        collateral: Address,
        virtual_supply: i128,
        virtual_balance: i128,
        reserve_ratio: u32,
        slippage: u32,
    ) -> Result<(), Error>;
    fn update_collateral_token(
        env: Env,
        caller: Address,
        collateral: Address,
        virtual_supply: i128,
        virtual_balance: i128,
        reserve_ratio: u32,
        slippage: u32,
    ) -> Result<(), Error>;
    fn remove_collateral_token(env: Env, caller: Address, collateral: Address)
        -> Result<(), Error>;
    fn update_beneficiary(env: Env, caller: Address, beneficiary: Address) -> Result<(), Error>;
    fn update_fees(env: Env, caller: Address, buy_fee: u32, sell_fee: u32) -> Result<(), Error>;
    fn open_buy_order(
        env: Env,
        caller: Address,
        buyer: Address,
        collateral: Address,
        amount: i128,
    ) -> Result<u32, Error>;
    fn open_sell_order(
        env: Env,
        caller: Address,
        seller: Address,
        collateral: Address,
        amount: i128,
    ) -> Result<u32, Error>;
    fn claim_buy_order(
        env: Env,
        buyer: Address,
        batch_id: u32,
        collateral: Address,
    ) -> Result<i128, Error>;
    fn claim_sell_order(
        env: Env,
        seller: Address,
        batch_id: u32,
        collateral: Address,
    ) -> Result<i128, Error>;
    fn get_collateral_token(env: Env, collateral: Address) -> Option<CollateralTokenConfig>;
}

#[contractclient(name = "ControllerClient")]
pub trait ControllerInterface {
    fn presale_state(env: Env) -> Result<PresaleState, Error>;
    fn contribute(env: Env, contributor: Address, amount: i128) -> Result<(), Error>;
    fn open_buy_order(
        env: Env,
        buyer: Address,
        collateral: Address,
        amount: i128,
    ) -> Result<u32, Error>;
    fn open_sell_order(
        env: Env,
        seller: Address,
        collateral: Address,
        amount: i128,
    ) -> Result<u32, Error>;
}
