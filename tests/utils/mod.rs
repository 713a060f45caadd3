/// Testing utilities for the fundraising scenarios

pub mod assertions;
pub mod fixtures;

pub use fixtures::*;

/// Common test constants
pub mod constants {
    pub const START_TIME: u64 = 1_000;
    pub const START_SEQUENCE: u32 = 100;
    pub const PRESALE_PERIOD: u64 = 3_600;
    pub const EXCHANGE_RATE: u64 = 2_000_000;
    pub const BENEFICIARY_PCT: u32 = 200_000;
    pub const RESERVE_RATIO: u32 = 100_000;
    pub const BATCH_BLOCKS: u32 = 5;
    pub const FEE: u32 = 1_000;
}
