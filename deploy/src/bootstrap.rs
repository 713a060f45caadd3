use acl::AclContractClient;
use acl_configurator::{AclConfigurator, AclConfiguratorClient};
use bancor_formula::BancorFormula;
use bonded_token::{BondedToken, BondedTokenClient};
use controller::{Controller, ControllerClient};
use fundraising_common::permissions::fundraising_permissions;
use fundraising_common::roles::{
    ADD_COLLATERAL_TOKEN_ROLE, APP_MANAGER_ROLE, CREATE_PERMISSIONS_ROLE, MINT_ROLE,
};
use fundraising_common::{Entity, Error, FundraisingApps};
use kernel::{KernelContract, KernelContractClient};
use market_maker::{MarketMaker, MarketMakerClient};
use presale::{PresaleContract, PresaleContractClient, PresaleParams};
use reserve::{ReserveContract, ReserveContractClient};
use soroban_sdk::{Address, Env, String as SorobanString, Symbol};

use crate::config::{parse_address, parse_optional_address, strkey, DeploymentParameters};
use crate::error::DeployError;

pub const TOKEN_DECIMALS: u32 = 18;
pub const TOKEN_NAME: &str = "Bonded Token";
pub const TOKEN_SYMBOL: &str = "BOND";

/// Names the apps are registered under in the kernel.
pub mod app_names {
    pub const RESERVE: &str = "reserve";
    pub const PRESALE: &str = "presale";
    pub const MARKET_MAKER: &str = "market_maker";
    pub const CONTROLLER: &str = "controller";
    pub const BONDED_TOKEN: &str = "bonded_token";
    pub const FORMULA: &str = "formula";
    pub const CONFIGURATOR: &str = "acl_configurator";
    pub const COLLATERAL: &str = "collateral";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dao {
    pub kernel: Address,
    pub acl: Address,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub dao: Dao,
    pub apps: FundraisingApps,
    pub formula: Address,
    pub configurator: Address,
    pub collateral: Address,
}

/// Unwraps the result of a `try_` contract call, logging the outcome of `step`.
fn confirm<T, C, I>(
    step: &'static str,
    result: Result<Result<T, C>, Result<Error, I>>,
) -> Result<T, DeployError> {
    match result {
        Ok(Ok(value)) => {
            log::info!("{step}: confirmed");
            Ok(value)
        }
        Err(Ok(error)) => {
            log::error!("{step}: failed with {error:?}");
            Err(DeployError::Step {
                step,
                code: error as u32,
            })
        }
        Ok(Err(_)) | Err(Err(_)) => {
            log::error!("{step}: aborted");
            Err(DeployError::Aborted { step })
        }
    }
}

fn holds_account(acl: &AclContractClient, app: &Address, role: &Symbol, who: &Address) -> bool {
    acl.get_permission(app, role)
        .map(|p| p.grantees.contains(&Entity::Account(who.clone())))
        .unwrap_or(false)
}

// ==================== Organization ====================

/// Creates the kernel and the ACL, or resumes `existing` ones.
///
/// The deployer becomes the permissions creator and the manager of
/// `APP_MANAGER_ROLE` on the kernel.
pub fn create_dao(env: &Env, deployer: &Address, existing: Option<Dao>) -> Result<Dao, DeployError> {
    let dao = existing.unwrap_or_else(|| Dao {
        kernel: env.register_contract(None, KernelContract),
        acl: env.register_contract(None, acl::AclContract),
    });
    log::info!(
        "organization: kernel {} acl {}",
        strkey(&dao.kernel),
        strkey(&dao.acl)
    );

    let acl = AclContractClient::new(env, &dao.acl);
    if !acl.has_initialized() {
        confirm("acl.initialize", acl.try_initialize(deployer))?;
    }
    let kernel = KernelContractClient::new(env, &dao.kernel);
    if !kernel.has_initialized() {
        confirm("kernel.initialize", kernel.try_initialize(&dao.acl))?;
    }
    if acl
        .get_permission_manager(&dao.kernel, &APP_MANAGER_ROLE)
        .is_none()
    {
        confirm(
            "acl.create_permission(APP_MGR)",
            acl.try_create_permission(
                deployer,
                &Entity::Account(deployer.clone()),
                &dao.kernel,
                &APP_MANAGER_ROLE,
                deployer,
            ),
        )?;
    }
    Ok(dao)
}

// ==================== Apps ====================

fn install(
    env: &Env,
    kernel: &KernelContractClient,
    deployer: &Address,
    name: &'static str,
    instantiate: impl FnOnce() -> Address,
) -> Result<Address, DeployError> {
    let key = Symbol::new(env, name);
    if let Some(app) = kernel.get_app(&key) {
        log::debug!("{name}: already registered at {}", strkey(&app));
        return Ok(app);
    }
    let app = instantiate();
    confirm("kernel.set_app", kernel.try_set_app(deployer, &key, &app))?;
    log::info!("{name}: registered at {}", strkey(&app));
    Ok(app)
}

/// Instantiates every app without permissions and registers it with the
/// kernel. Apps the kernel already knows are reused.
pub fn register_apps(
    env: &Env,
    deployer: &Address,
    dao: &Dao,
    params: &DeploymentParameters,
) -> Result<Deployment, DeployError> {
    let kernel = KernelContractClient::new(env, &dao.kernel);
    let bonded_token = parse_optional_address(env, &params.bonded_token_address)?;
    let collateral = parse_optional_address(env, &params.collateral_token_address)?;

    let reserve = install(env, &kernel, deployer, app_names::RESERVE, || {
        env.register_contract(None, ReserveContract)
    })?;
    let presale = install(env, &kernel, deployer, app_names::PRESALE, || {
        env.register_contract(None, PresaleContract)
    })?;
    let market_maker = install(env, &kernel, deployer, app_names::MARKET_MAKER, || {
        env.register_contract(None, MarketMaker)
    })?;
    let controller = install(env, &kernel, deployer, app_names::CONTROLLER, || {
        env.register_contract(None, Controller)
    })?;
    let bonded_token = install(env, &kernel, deployer, app_names::BONDED_TOKEN, || {
        bonded_token.unwrap_or_else(|| env.register_contract(None, BondedToken))
    })?;
    let formula = install(env, &kernel, deployer, app_names::FORMULA, || {
        env.register_contract(None, BancorFormula)
    })?;
    let configurator = install(env, &kernel, deployer, app_names::CONFIGURATOR, || {
        env.register_contract(None, AclConfigurator)
    })?;
    let collateral = install(env, &kernel, deployer, app_names::COLLATERAL, || {
        collateral.unwrap_or_else(|| {
            env.register_stellar_asset_contract_v2(deployer.clone())
                .address()
        })
    })?;

    Ok(Deployment {
        dao: dao.clone(),
        apps: FundraisingApps {
            reserve,
            presale,
            market_maker,
            controller,
            bonded_token,
        },
        formula,
        configurator,
        collateral,
    })
}

/// Initializes each app once. Apps reporting `has_initialized` are skipped.
pub fn initialize_apps(
    env: &Env,
    deployment: &Deployment,
    params: &DeploymentParameters,
) -> Result<(), DeployError> {
    let acl = &deployment.dao.acl;
    let apps = &deployment.apps;
    let beneficiary = parse_address(env, &params.beneficiary_address)?;

    let bonded = BondedTokenClient::new(env, &apps.bonded_token);
    if !bonded.has_initialized() {
        confirm(
            "bonded_token.initialize",
            bonded.try_initialize(
                acl,
                &TOKEN_DECIMALS,
                &SorobanString::from_str(env, TOKEN_NAME),
                &SorobanString::from_str(env, TOKEN_SYMBOL),
            ),
        )?;
    }

    let reserve = ReserveContractClient::new(env, &apps.reserve);
    if !reserve.has_initialized() {
        confirm("reserve.initialize", reserve.try_initialize(acl))?;
    }

    let presale = PresaleContractClient::new(env, &apps.presale);
    if !presale.has_initialized() {
        confirm(
            "presale.initialize",
            presale.try_initialize(
                acl,
                &apps.controller,
                &apps.market_maker,
                &apps.bonded_token,
                &apps.reserve,
                &beneficiary,
                &deployment.collateral,
                &PresaleParams {
                    period: params.presale_period,
                    exchange_rate: params.presale_exchange_rate as i128,
                    minting_for_beneficiary_ppm: params.minting_beneficiary_pct,
                    open_date: params.start_date,
                },
            ),
        )?;
    }

    let market_maker = MarketMakerClient::new(env, &apps.market_maker);
    if !market_maker.has_initialized() {
        confirm(
            "market_maker.initialize",
            market_maker.try_initialize(
                acl,
                &apps.controller,
                &apps.bonded_token,
                &deployment.formula,
                &apps.reserve,
                &beneficiary,
                &params.batch_blocks,
                &params.buy_fee,
                &params.sell_fee,
            ),
        )?;
    }

    let controller = ControllerClient::new(env, &apps.controller);
    if !controller.has_initialized() {
        confirm(
            "controller.initialize",
            controller.try_initialize(acl, &apps.presale, &apps.market_maker, &apps.reserve),
        )?;
    }
    Ok(())
}

// ==================== Permissions ====================

/// Lends `CREATE_PERMISSIONS_ROLE` to the configurator, creates the whole
/// permission layout with the deployer as manager, then takes the role back.
/// Returns the number of permissions created, 0 when the layout exists.
pub fn setup_permissions(
    env: &Env,
    deployer: &Address,
    deployment: &Deployment,
) -> Result<u32, DeployError> {
    let acl = AclContractClient::new(env, &deployment.dao.acl);
    let apps = &deployment.apps;
    let configurator = Entity::Account(deployment.configurator.clone());

    let mut created = 0;
    if acl.get_permission(&apps.bonded_token, &MINT_ROLE).is_none() {
        if !holds_account(
            &acl,
            &deployment.dao.acl,
            &CREATE_PERMISSIONS_ROLE,
            &deployment.configurator,
        ) {
            confirm(
                "acl.grant_permission(CRT_PERMS)",
                acl.try_grant_permission(
                    deployer,
                    &configurator,
                    &deployment.dao.acl,
                    &CREATE_PERMISSIONS_ROLE,
                ),
            )?;
        }
        created = confirm(
            "acl_configurator.setup_fundraising_permissions",
            AclConfiguratorClient::new(env, &deployment.configurator)
                .try_setup_fundraising_permissions(
                    deployer,
                    &deployment.dao.acl,
                    &apps.reserve,
                    &apps.presale,
                    &apps.market_maker,
                    &apps.controller,
                    &apps.bonded_token,
                ),
        )?;
        log::info!("created {created} fundraising permissions");
    }

    if holds_account(
        &acl,
        &deployment.dao.acl,
        &CREATE_PERMISSIONS_ROLE,
        &deployment.configurator,
    ) {
        confirm(
            "acl.revoke_permission(CRT_PERMS)",
            acl.try_revoke_permission(
                deployer,
                &configurator,
                &deployment.dao.acl,
                &CREATE_PERMISSIONS_ROLE,
            ),
        )?;
    }
    Ok(created)
}

/// Whitelists the collateral through the controller under a temporary
/// `ADD_COLLATERAL_TOKEN_ROLE` grant that is revoked afterwards.
pub fn setup_collateral(
    env: &Env,
    deployer: &Address,
    deployment: &Deployment,
    params: &DeploymentParameters,
) -> Result<(), DeployError> {
    let acl = AclContractClient::new(env, &deployment.dao.acl);
    let controller = &deployment.apps.controller;
    let market_maker = MarketMakerClient::new(env, &deployment.apps.market_maker);
    let account = Entity::Account(deployer.clone());

    if market_maker
        .get_collateral_token(&deployment.collateral)
        .is_none()
    {
        if acl
            .get_permission(controller, &ADD_COLLATERAL_TOKEN_ROLE)
            .is_none()
        {
            confirm(
                "acl.create_permission(ADD_COLL)",
                acl.try_create_permission(
                    deployer,
                    &account,
                    controller,
                    &ADD_COLLATERAL_TOKEN_ROLE,
                    deployer,
                ),
            )?;
        } else if !holds_account(&acl, controller, &ADD_COLLATERAL_TOKEN_ROLE, deployer) {
            confirm(
                "acl.grant_permission(ADD_COLL)",
                acl.try_grant_permission(deployer, &account, controller, &ADD_COLLATERAL_TOKEN_ROLE),
            )?;
        }
        confirm(
            "controller.add_collateral_token",
            ControllerClient::new(env, controller).try_add_collateral_token(
                deployer,
                &deployment.collateral,
                &0,
                &0,
                &params.reserve_ratio,
                &params.slippage,
            ),
        )?;
    }

    if holds_account(&acl, controller, &ADD_COLLATERAL_TOKEN_ROLE, deployer) {
        confirm(
            "acl.revoke_permission(ADD_COLL)",
            acl.try_revoke_permission(deployer, &account, controller, &ADD_COLLATERAL_TOKEN_ROLE),
        )?;
    }
    Ok(())
}

/// Every `(app, role)` the deployer ends up managing.
fn managed_permissions(env: &Env, deployer: &Address, deployment: &Deployment) -> Vec<(Address, Symbol)> {
    let mut entries: Vec<(Address, Symbol)> =
        fundraising_permissions(env, &deployment.apps, deployer)
            .iter()
            .map(|p| (p.app, p.role))
            .collect();
    entries.push((deployment.apps.controller.clone(), ADD_COLLATERAL_TOKEN_ROLE));
    entries.push((deployment.dao.kernel.clone(), APP_MANAGER_ROLE));
    entries.push((deployment.dao.acl.clone(), CREATE_PERMISSIONS_ROLE));
    entries
}

/// Hands every permission the deployer manages over to `governance`.
///
/// For each one: grant to governance if the deployer held it, revoke from the
/// deployer, then reassign the manager. Returns how many were moved.
pub fn transfer_permissions(
    env: &Env,
    deployer: &Address,
    governance: &Address,
    deployment: &Deployment,
) -> Result<u32, DeployError> {
    let acl = AclContractClient::new(env, &deployment.dao.acl);
    let from = Entity::Account(deployer.clone());
    let to = Entity::Account(governance.clone());

    let mut moved = 0;
    for (app, role) in managed_permissions(env, deployer, deployment) {
        let Some(permission) = acl.get_permission(&app, &role) else {
            continue;
        };
        if permission.manager != *deployer {
            continue;
        }
        if permission.grantees.contains(&from) {
            if !permission.grantees.contains(&to) {
                confirm(
                    "acl.grant_permission",
                    acl.try_grant_permission(deployer, &to, &app, &role),
                )?;
            }
            confirm(
                "acl.revoke_permission",
                acl.try_revoke_permission(deployer, &from, &app, &role),
            )?;
        }
        confirm(
            "acl.set_permission_manager",
            acl.try_set_permission_manager(deployer, governance, &app, &role),
        )?;
        moved += 1;
    }
    log::info!("moved {moved} permissions to {}", strkey(governance));
    Ok(moved)
}

/// Runs the whole bootstrap. Pass the `Dao` of an interrupted run to resume
/// it; every step skips the work that already landed.
///
/// `env` must authorize `deployer` for each call.
pub fn deploy(
    env: &Env,
    deployer: &Address,
    params: &DeploymentParameters,
    existing: Option<Dao>,
) -> Result<Deployment, DeployError> {
    params.validate()?;
    let governance = parse_optional_address(env, &params.governance_address)?;

    let dao = create_dao(env, deployer, existing)?;
    let deployment = register_apps(env, deployer, &dao, params)?;
    initialize_apps(env, &deployment, params)?;
    setup_permissions(env, deployer, &deployment)?;
    setup_collateral(env, deployer, &deployment, params)?;
    if let Some(governance) = governance {
        transfer_permissions(env, deployer, &governance, &deployment)?;
    }
    Ok(deployment)
}
