#![no_std]
#![allow(clippy::too_many_arguments)]


use fundraising_common::interfaces::AclClient;
use fundraising_common::permissions::fundraising_permissions;
use fundraising_common::{Error, FundraisingApps};
use soroban_sdk::{contract, contractimpl, contractmeta, symbol_short, Address, Env};

contractmeta!(
    key = "Description",
    val = "Creates every fundraising permission in one transaction"
);

#[contract]
pub struct AclConfigurator;

#[contractimpl]
impl AclConfigurator {
    /// Creates the fundraising permission layout with `owner` as manager.
    ///
    /// The configurator must hold `CREATE_PERMISSIONS_ROLE` on `acl`. Each
    /// permission is created under the configurator's own management so the
    /// extra grantees can be added, then handed to `owner`.
    pub fn setup_fundraising_permissions(
        env: Env,
        owner: Address,
        acl: Address,
        reserve: Address,
        presale: Address,
        market_maker: Address,
        controller: Address,
        bonded_token: Address,
    ) -> Result<u32, Error> {
        owner.require_auth();
        let this = env.current_contract_address();
        let acl = AclClient::new(&env, &acl);
        let apps = FundraisingApps {
            reserve,
            presale,
            market_maker,
            controller,
            bonded_token,
        };

        let layout = fundraising_permissions(&env, &apps, &owner);
        for permission in layout.iter() {
            let first = permission.grantees.get(0).ok_or(Error::InvalidConfig)?;
            acl.create_permission(&this, &first, &permission.app, &permission.role, &this);
            for grantee in permission.grantees.iter().skip(1) {
                acl.grant_permission(&this, &grantee, &permission.app, &permission.role);
            }
            acl.set_permission_manager(&this, &owner, &permission.app, &permission.role);
        }

        env.events().publish(
            (symbol_short!("ACLCFG"), symbol_short!("SETUP")),
            (owner, layout.len()),
        );
        Ok(layout.len())
    }
}
