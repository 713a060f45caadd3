use soroban_sdk::{Address, Env, Symbol, Vec};

use crate::roles::*;
use crate::{Entity, FundraisingApps, PermissionSpec};

fn spec(env: &Env, app: &Address, role: Symbol, grantees: &[Entity]) -> PermissionSpec {
    PermissionSpec {
        app: app.clone(),
        role,
        grantees: Vec::from_slice(env, grantees),
    }
}

/// Every permission the fundraising apps need, in creation order.
///
/// `ADD_COLLATERAL_TOKEN_ROLE` on the controller is not part of the layout:
/// it only exists for the duration of collateral setup.
pub fn fundraising_permissions(
    env: &Env,
    apps: &FundraisingApps,
    owner: &Address,
) -> Vec<PermissionSpec> {
    let owner = Entity::Account(owner.clone());
    let market_maker = Entity::Account(apps.market_maker.clone());
    let presale = Entity::Account(apps.presale.clone());
    let controller = Entity::Account(apps.controller.clone());

    let mut layout = Vec::new(env);

    // bonded token manager
    layout.push_back(spec(
        env,
        &apps.bonded_token,
        MINT_ROLE,
        &[market_maker.clone(), presale.clone()],
    ));
    layout.push_back(spec(env, &apps.bonded_token, BURN_ROLE, &[market_maker.clone()]));

    // reserve
    layout.push_back(spec(env, &apps.reserve, TRANSFER_ROLE, &[market_maker.clone()]));
    layout.push_back(spec(
        env,
        &apps.reserve,
        ADD_PROTECTED_TOKEN_ROLE,
        &[controller.clone()],
    ));

    // presale
    layout.push_back(spec(env, &apps.presale, OPEN_ROLE, &[controller.clone()]));
    layout.push_back(spec(
        env,
        &apps.presale,
        REDUCE_BENEFICIARY_PCT_ROLE,
        &[owner.clone()],
    ));
    layout.push_back(spec(env, &apps.presale, CONTRIBUTE_ROLE, &[Entity::Any]));

    // market maker; the presale opens trading once it closes
    layout.push_back(spec(
        env,
        &apps.market_maker,
        OPEN_ROLE,
        &[controller.clone(), presale],
    ));
    for role in [
        UPDATE_BENEFICIARY_ROLE,
        UPDATE_FEES_ROLE,
        ADD_COLLATERAL_TOKEN_ROLE,
        REMOVE_COLLATERAL_TOKEN_ROLE,
        UPDATE_COLLATERAL_TOKEN_ROLE,
        OPEN_BUY_ORDER_ROLE,
        OPEN_SELL_ORDER_ROLE,
    ] {
        layout.push_back(spec(env, &apps.market_maker, role, &[controller.clone()]));
    }

    // controller
    for role in [
        UPDATE_BENEFICIARY_ROLE,
        UPDATE_FEES_ROLE,
        REMOVE_COLLATERAL_TOKEN_ROLE,
        UPDATE_COLLATERAL_TOKEN_ROLE,
        OPEN_PRESALE_ROLE,
    ] {
        layout.push_back(spec(env, &apps.controller, role, &[owner.clone()]));
    }
    for role in [CONTRIBUTE_ROLE, OPEN_BUY_ORDER_ROLE, OPEN_SELL_ORDER_ROLE] {
        layout.push_back(spec(env, &apps.controller, role, &[Entity::Any]));
    }

    layout
}
