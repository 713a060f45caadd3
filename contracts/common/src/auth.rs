use soroban_sdk::{Address, Env, Symbol};

use crate::interfaces::AclClient;
use crate::Error;

/// Capability check run at the top of every privileged entry point.
///
/// `who` must have signed the call (or be the invoking contract) and hold
/// `role` on the current contract in the permission registry at `acl`.
pub fn authorize(env: &Env, acl: &Address, who: &Address, role: &Symbol) -> Result<(), Error> {
    who.require_auth();
    let app = env.current_contract_address();
    if AclClient::new(env, acl).has_permission(who, &app, role) {
        Ok(())
    } else {
        Err(Error::Unauthorized)
    }
}
