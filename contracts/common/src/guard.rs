use soroban_sdk::{symbol_short, Env, Symbol};

use crate::Error;

const REENTRANCY_LOCK: Symbol = symbol_short!("relock");

/// Takes the per-contract reentrancy latch.
pub fn enter(env: &Env) -> Result<(), Error> {
    let locked: bool = env
        .storage()
        .temporary()
        .get(&REENTRANCY_LOCK)
        .unwrap_or(false);
    if locked {
        return Err(Error::ReentrantCall);
    }
    env.storage().temporary().set(&REENTRANCY_LOCK, &true);
    Ok(())
}

pub fn exit(env: &Env) {
    env.storage().temporary().remove(&REENTRANCY_LOCK);
}
