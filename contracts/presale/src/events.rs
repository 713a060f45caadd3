use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

const PRESALE: Symbol = symbol_short!("PRESALE");

#[derive(Clone)]
#[contracttype]
pub struct ContributeEvent {
    pub contributor: Address,
    pub value: i128,
    pub amount: i128,
}

#[derive(Clone)]
#[contracttype]
pub struct CloseEvent {
    pub total_raised: i128,
    pub to_reserve: i128,
    pub to_beneficiary: i128,
    pub beneficiary_tokens: i128,
}

pub fn emit_open(env: &Env, open_date: u64) {
    env.events()
        .publish((PRESALE, symbol_short!("OPEN")), open_date);
}

pub fn emit_contribute(env: &Env, event: ContributeEvent) {
    env.events()
        .publish((PRESALE, symbol_short!("CONTRIB")), event);
}

pub fn emit_close(env: &Env, event: CloseEvent) {
    env.events().publish((PRESALE, symbol_short!("CLOSE")), event);
}

pub fn emit_beneficiary_pct(env: &Env, ppm: u32) {
    env.events()
        .publish((PRESALE, symbol_short!("BEN_PCT")), ppm);
}
