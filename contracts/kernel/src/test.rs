#![cfg(test)]
#![allow(clippy::unwrap_used)]

use acl::{AclContract, AclContractClient};
use fundraising_common::roles::APP_MANAGER_ROLE;
use fundraising_common::{Entity, Error};
use soroban_sdk::{symbol_short, testutils::Address as _, Address, Env};

use crate::{KernelContract, KernelContractClient};

fn setup(env: &Env) -> (KernelContractClient<'_>, AclContractClient<'_>, Address) {
    env.mock_all_auths();
    let deployer = Address::generate(env);
    let acl = AclContractClient::new(env, &env.register_contract(None, AclContract));
    acl.initialize(&deployer);
    let kernel = KernelContractClient::new(env, &env.register_contract(None, KernelContract));
    kernel.initialize(&acl.address);
    acl.create_permission(
        &deployer,
        &Entity::Account(deployer.clone()),
        &kernel.address,
        &APP_MANAGER_ROLE,
        &deployer,
    );
    (kernel, acl, deployer)
}

#[test]
fn test_initialize_once() {
    let env = Env::default();
    let (kernel, acl, _) = setup(&env);
    assert!(kernel.has_initialized());
    assert_eq!(kernel.acl(), acl.address);
    assert!(matches!(
        kernel.try_initialize(&acl.address),
        Err(Ok(Error::AlreadyInitialized))
    ));
}

#[test]
fn test_set_app_registers_once() {
    let env = Env::default();
    let (kernel, _, deployer) = setup(&env);
    let reserve = Address::generate(&env);
    kernel.set_app(&deployer, &symbol_short!("reserve"), &reserve);
    assert_eq!(kernel.get_app(&symbol_short!("reserve")), Some(reserve));

    // names are immutable once bound
    assert!(matches!(
        kernel.try_set_app(&deployer, &symbol_short!("reserve"), &Address::generate(&env)),
        Err(Ok(Error::AppAlreadyRegistered))
    ));
    assert_eq!(kernel.organization().apps.len(), 1);
}

#[test]
fn test_set_app_requires_app_manager() {
    let env = Env::default();
    let (kernel, _, _) = setup(&env);
    let stranger = Address::generate(&env);
    assert!(matches!(
        kernel.try_set_app(&stranger, &symbol_short!("presale"), &stranger),
        Err(Ok(Error::Unauthorized))
    ));
    assert_eq!(kernel.get_app(&symbol_short!("presale")), None);
}
