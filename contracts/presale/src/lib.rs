#![no_std]
#![allow(clippy::too_many_arguments)]

mod contract;
mod events;
mod storage;
mod types;


pub use contract::{PresaleContract, PresaleContractClient};
pub use types::{PresaleConfig, PresaleParams};
