use soroban_sdk::{symbol_short, Address, Env, Symbol};

const BONDED: Symbol = symbol_short!("BONDED");

pub fn emit_mint(env: &Env, to: &Address, amount: i128) {
    env.events()
        .publish((BONDED, symbol_short!("MINT"), to.clone()), amount);
}

pub fn emit_burn(env: &Env, from: &Address, amount: i128) {
    env.events()
        .publish((BONDED, symbol_short!("BURN"), from.clone()), amount);
}

pub fn emit_transfer(env: &Env, from: &Address, to: &Address, amount: i128) {
    env.events().publish(
        (BONDED, symbol_short!("TRANSFER"), from.clone(), to.clone()),
        amount,
    );
}

pub fn emit_approve(env: &Env, from: &Address, spender: &Address, amount: i128) {
    env.events().publish(
        (BONDED, symbol_short!("APPROVE"), from.clone(), spender.clone()),
        amount,
    );
}
