//! Role identifiers checked against the permission registry.
//!
//! Roles are short symbols so they can be declared as constants.

use soroban_sdk::{symbol_short, Symbol};

// ACL / kernel
pub const CREATE_PERMISSIONS_ROLE: Symbol = symbol_short!("CRT_PERMS");
pub const APP_MANAGER_ROLE: Symbol = symbol_short!("APP_MGR");

// Bonded token manager
pub const MINT_ROLE: Symbol = symbol_short!("MINT");
pub const BURN_ROLE: Symbol = symbol_short!("BURN");

// Reserve
pub const TRANSFER_ROLE: Symbol = symbol_short!("TRANSFER");
pub const ADD_PROTECTED_TOKEN_ROLE: Symbol = symbol_short!("ADD_PROT");

// Presale
pub const OPEN_ROLE: Symbol = symbol_short!("OPEN");
pub const CONTRIBUTE_ROLE: Symbol = symbol_short!("CONTRIB");
pub const REDUCE_BENEFICIARY_PCT_ROLE: Symbol = symbol_short!("RED_BENEF");

// Market maker and controller
pub const UPDATE_BENEFICIARY_ROLE: Symbol = symbol_short!("UPD_BENEF");
pub const UPDATE_FEES_ROLE: Symbol = symbol_short!("UPD_FEES");
pub const ADD_COLLATERAL_TOKEN_ROLE: Symbol = symbol_short!("ADD_COLL");
pub const REMOVE_COLLATERAL_TOKEN_ROLE: Symbol = symbol_short!("REM_COLL");
pub const UPDATE_COLLATERAL_TOKEN_ROLE: Symbol = symbol_short!("UPD_COLL");
pub const OPEN_BUY_ORDER_ROLE: Symbol = symbol_short!("OPEN_BUY");
pub const OPEN_SELL_ORDER_ROLE: Symbol = symbol_short!("OPEN_SELL");

// Controller only
pub const OPEN_PRESALE_ROLE: Symbol = symbol_short!("OPEN_PRE");
