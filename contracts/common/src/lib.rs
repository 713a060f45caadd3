#![no_std]

pub mod auth;
pub mod errors;
pub mod guard;
pub mod interfaces;
pub mod math;
pub mod permissions;
pub mod roles;
pub mod types;

pub use errors::Error;
pub use math::PPM;
pub use types::{
    CollateralTokenConfig, Entity, FundraisingApps, Organization, Permission, PermissionSpec,
    PresaleState,
};
