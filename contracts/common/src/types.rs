use soroban_sdk::{contracttype, Address, Map, Symbol, Vec};

/// A grantee in the permission registry. `Any` matches every caller.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Entity {
    Any,
    Account(Address),
}

/// One `(app, role)` entry of the permission registry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Permission {
    pub manager: Address,
    pub grantees: Vec<Entity>,
}

/// A permission to create during setup: `role` on `app`, granted to `grantees`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PermissionSpec {
    pub app: Address,
    pub role: Symbol,
    pub grantees: Vec<Entity>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Organization {
    pub kernel: Address,
    pub acl: Address,
    pub apps: Map<Symbol, Address>,
}

/// Addresses of the fundraising apps wired together at deployment.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundraisingApps {
    pub reserve: Address,
    pub presale: Address,
    pub market_maker: Address,
    pub controller: Address,
    pub bonded_token: Address,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PresaleState {
    Pending = 0,
    Funding = 1,
    Finished = 2,
    Closed = 3,
}

/// Per-collateral market maker parameters. Ratios and slippage are PPM.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralTokenConfig {
    pub whitelisted: bool,
    pub virtual_supply: i128,
    pub virtual_balance: i128,
    pub reserve_ratio: u32,
    pub slippage: u32,
}
