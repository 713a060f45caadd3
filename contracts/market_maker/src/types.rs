use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketMakerConfig {
    pub acl: Address,
    pub controller: Address,
    pub bonded_token: Address,
    pub formula: Address,
    pub reserve: Address,
    pub beneficiary: Address,
    pub batch_blocks: u32,
    /// PPM of every buy order, paid to the beneficiary when the order opens.
    pub buy_fee: u32,
    /// PPM of every sell return, paid to the beneficiary when the order is claimed.
    pub sell_fee: u32,
}

/// All orders of one collateral opened in the same block range.
///
/// `supply`, `balance`, `reserve_ratio` and `slippage` are frozen when the
/// first order of the range opens the batch.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Batch {
    pub id: u32,
    pub collateral: Address,
    pub start: u32,
    pub end: u32,
    pub supply: i128,
    pub balance: i128,
    pub reserve_ratio: u32,
    pub slippage: u32,
    pub total_buy_spend: i128,
    pub total_buy_return: i128,
    pub total_sell_spend: i128,
    pub total_sell_return: i128,
    pub buyers: u32,
    pub sellers: u32,
    pub claimed_buys: u32,
    pub claimed_sells: u32,
    pub claimed_buy_return: i128,
    pub claimed_sell_return: i128,
    pub settled: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Order {
    pub batch_id: u32,
    pub collateral: Address,
    pub account: Address,
    pub amount: i128,
    pub claimed: bool,
}
