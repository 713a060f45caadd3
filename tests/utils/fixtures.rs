/// Fully deployed fundraising organization
use acl::AclContractClient;
use bonded_token::BondedTokenClient;
use controller::ControllerClient;
use fundraising_deploy::config::strkey;
use fundraising_deploy::{deploy, Deployment, DeploymentParameters};
use market_maker::MarketMakerClient;
use presale::PresaleContractClient;
use reserve::ReserveContractClient;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env,
};

use super::constants::*;

pub fn parameters(beneficiary: &Address) -> DeploymentParameters {
    DeploymentParameters {
        start_date: 0,
        minting_beneficiary_pct: BENEFICIARY_PCT,
        presale_period: PRESALE_PERIOD,
        presale_exchange_rate: EXCHANGE_RATE,
        reserve_ratio: RESERVE_RATIO,
        batch_blocks: BATCH_BLOCKS,
        slippage: 1_000_000,
        buy_fee: FEE,
        sell_fee: FEE,
        collateral_token_address: None,
        bonded_token_address: None,
        governance_address: None,
        beneficiary_address: strkey(beneficiary),
    }
}

pub struct Fundraising<'a> {
    pub env: &'a Env,
    pub deployer: Address,
    pub beneficiary: Address,
    pub deployment: Deployment,
    pub acl: AclContractClient<'a>,
    pub controller: ControllerClient<'a>,
    pub presale: PresaleContractClient<'a>,
    pub market_maker: MarketMakerClient<'a>,
    pub bonded: BondedTokenClient<'a>,
    pub reserve: ReserveContractClient<'a>,
}

impl<'a> Fundraising<'a> {
    /// Deploys everything with `env` authorizing every call.
    pub fn new(env: &'a Env) -> Self {
        Self::with(env, |_| {})
    }

    /// Deploys with parameters adjusted by `configure`.
    pub fn with(env: &'a Env, configure: impl FnOnce(&mut DeploymentParameters)) -> Self {
        env.mock_all_auths();
        env.ledger().set_timestamp(START_TIME);
        env.ledger().set_sequence_number(START_SEQUENCE);

        let deployer = Address::generate(env);
        let beneficiary = Address::generate(env);
        let mut params = parameters(&beneficiary);
        configure(&mut params);
        let deployment = deploy(env, &deployer, &params, None).unwrap();

        let apps = &deployment.apps;
        Self {
            env,
            acl: AclContractClient::new(env, &deployment.dao.acl),
            controller: ControllerClient::new(env, &apps.controller),
            presale: PresaleContractClient::new(env, &apps.presale),
            market_maker: MarketMakerClient::new(env, &apps.market_maker),
            bonded: BondedTokenClient::new(env, &apps.bonded_token),
            reserve: ReserveContractClient::new(env, &apps.reserve),
            deployer,
            beneficiary,
            deployment,
        }
    }

    pub fn collateral(&self) -> &Address {
        &self.deployment.collateral
    }

    /// A fresh account holding `amount` collateral.
    pub fn funded_account(&self, amount: i128) -> Address {
        let who = Address::generate(self.env);
        token::StellarAssetClient::new(self.env, self.collateral()).mint(&who, &amount);
        who
    }

    pub fn collateral_balance(&self, who: &Address) -> i128 {
        token::Client::new(self.env, self.collateral()).balance(who)
    }

    pub fn end_presale(&self) {
        self.env
            .ledger()
            .set_timestamp(START_TIME + PRESALE_PERIOD);
    }

    /// Opens the presale, collects `contributions` and closes it.
    pub fn run_presale(&self, contributions: &[(&Address, i128)]) {
        self.controller.open_presale(&self.deployer);
        for (who, amount) in contributions {
            self.controller.contribute(who, amount);
        }
        self.end_presale();
        self.controller.close_presale();
    }

    pub fn advance_blocks(&self, blocks: u32) {
        let current = self.env.ledger().sequence();
        self.env.ledger().set_sequence_number(current + blocks);
    }
}
