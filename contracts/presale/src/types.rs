use soroban_sdk::{contracttype, Address};

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct PresaleConfig {
    pub acl: Address,
    pub controller: Address,
    pub market_maker: Address,
    pub bonded_token: Address,
    pub reserve: Address,
    pub beneficiary: Address,
    pub collateral_token: Address,
    pub period: u64,              // Funding window in seconds
    pub exchange_rate: i128,      // Bonded tokens per collateral unit, in PPM
    pub minting_for_beneficiary_ppm: u32,
}

/// Sale terms passed to `initialize`. `open_date` may be 0 to let the open
/// call pick it.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct PresaleParams {
    pub period: u64,
    pub exchange_rate: i128,
    pub minting_for_beneficiary_ppm: u32,
    pub open_date: u64,
}

#[contracttype]
pub enum DataKey {
    Config,
    OpenDate,
    Opened,
    Closed,
    TotalRaised,
    TotalSold,
    ContributorsCounter,
    Contribution(Address),
}
