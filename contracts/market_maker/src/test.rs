#![cfg(test)]
#![allow(clippy::unwrap_used)]

use acl::{AclContract, AclContractClient};
use bancor_formula::BancorFormula;
use bonded_token::{BondedToken, BondedTokenClient};
use fundraising_common::roles::*;
use fundraising_common::{Entity, Error};
use reserve::{ReserveContract, ReserveContractClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String,
};

use crate::{MarketMaker, MarketMakerClient};

const BATCH_BLOCKS: u32 = 10;
const START: u32 = 100;
const SUPPLY: i128 = 1_000_000;
const BALANCE: i128 = 250_000;
const RATIO: u32 = 500_000;
const NO_SLIPPAGE_LIMIT: u32 = 1_000_000;

// ==================== Helpers ====================

struct Setup<'a> {
    env: &'a Env,
    acl: AclContractClient<'a>,
    owner: Address,
    mm: MarketMakerClient<'a>,
    bonded: BondedTokenClient<'a>,
    reserve: ReserveContractClient<'a>,
    collateral: Address,
    operator: Address,
    beneficiary: Address,
    holder: Address,
}

impl<'a> Setup<'a> {
    fn collateral_balance(&self, who: &Address) -> i128 {
        token::Client::new(self.env, &self.collateral).balance(who)
    }

    fn fund(&self, who: &Address, amount: i128) {
        token::StellarAssetClient::new(self.env, &self.collateral).mint(who, &amount);
    }

    fn close_batch(&self) {
        let next = (self.env.ledger().sequence() / BATCH_BLOCKS + 1) * BATCH_BLOCKS;
        self.env.ledger().set_sequence_number(next);
    }
}

fn setup_with(env: &Env, buy_fee: u32, sell_fee: u32, slippage: u32) -> Setup<'_> {
    // buyers sign the collateral pull nested under the operator's call
    env.mock_all_auths_allowing_non_root_auth();
    env.ledger().set_sequence_number(START);

    let owner = Address::generate(env);
    let operator = Address::generate(env);
    let beneficiary = Address::generate(env);
    let holder = Address::generate(env);

    let acl = AclContractClient::new(env, &env.register_contract(None, AclContract));
    acl.initialize(&owner);

    let bonded = BondedTokenClient::new(env, &env.register_contract(None, BondedToken));
    bonded.initialize(
        &acl.address,
        &18,
        &String::from_str(env, "Bonded"),
        &String::from_str(env, "BON"),
    );
    let reserve = ReserveContractClient::new(env, &env.register_contract(None, ReserveContract));
    reserve.initialize(&acl.address);
    let formula = env.register_contract(None, BancorFormula);

    let mm = MarketMakerClient::new(env, &env.register_contract(None, MarketMaker));
    mm.initialize(
        &acl.address,
        &operator,
        &bonded.address,
        &formula,
        &reserve.address,
        &beneficiary,
        &BATCH_BLOCKS,
        &buy_fee,
        &sell_fee,
    );

    let mm_entity = Entity::Account(mm.address.clone());
    acl.create_permission(&owner, &mm_entity, &bonded.address, &MINT_ROLE, &owner);
    acl.grant_permission(&owner, &Entity::Account(owner.clone()), &bonded.address, &MINT_ROLE);
    acl.create_permission(&owner, &mm_entity, &bonded.address, &BURN_ROLE, &owner);
    acl.create_permission(&owner, &mm_entity, &reserve.address, &TRANSFER_ROLE, &owner);
    for role in [
        OPEN_ROLE,
        ADD_COLLATERAL_TOKEN_ROLE,
        UPDATE_COLLATERAL_TOKEN_ROLE,
        REMOVE_COLLATERAL_TOKEN_ROLE,
        UPDATE_BENEFICIARY_ROLE,
        UPDATE_FEES_ROLE,
        OPEN_BUY_ORDER_ROLE,
        OPEN_SELL_ORDER_ROLE,
    ] {
        acl.create_permission(
            &owner,
            &Entity::Account(operator.clone()),
            &mm.address,
            &role,
            &owner,
        );
    }

    let collateral = env
        .register_stellar_asset_contract_v2(owner.clone())
        .address();
    token::StellarAssetClient::new(env, &collateral).mint(&reserve.address, &BALANCE);
    bonded.mint(&owner, &holder, &SUPPLY);

    mm.add_collateral_token(&operator, &collateral, &0, &0, &RATIO, &slippage);
    mm.open(&operator);

    Setup {
        env,
        acl,
        owner,
        mm,
        bonded,
        reserve,
        collateral,
        operator,
        beneficiary,
        holder,
    }
}

fn setup(env: &Env) -> Setup<'_> {
    setup_with(env, 0, 0, NO_SLIPPAGE_LIMIT)
}

// ==================== Lifecycle ====================

#[test]
fn test_initialize_validates_config() {
    let env = Env::default();
    let mm = MarketMakerClient::new(&env, &env.register_contract(None, MarketMaker));
    let a = Address::generate(&env);
    assert!(matches!(
        mm.try_initialize(&a, &a, &a, &a, &a, &a, &0, &0, &0),
        Err(Ok(Error::InvalidConfig))
    ));
    assert!(matches!(
        mm.try_initialize(&a, &a, &a, &a, &a, &a, &10, &1_000_000, &0),
        Err(Ok(Error::InvalidConfig))
    ));
    mm.initialize(&a, &a, &a, &a, &a, &a, &10, &0, &0);
    assert!(mm.has_initialized());
    assert!(matches!(
        mm.try_initialize(&a, &a, &a, &a, &a, &a, &10, &0, &0),
        Err(Ok(Error::AlreadyInitialized))
    ));
}

#[test]
fn test_open_once() {
    let env = Env::default();
    let s = setup(&env);
    assert!(s.mm.is_open());
    assert!(matches!(
        s.mm.try_open(&s.operator),
        Err(Ok(Error::InvalidState))
    ));
}

#[test]
fn test_orders_require_open_market() {
    let env = Env::default();
    let s = setup(&env);
    let mm = MarketMakerClient::new(&env, &env.register_contract(None, MarketMaker));
    mm.initialize(
        &s.acl.address,
        &s.operator,
        &s.bonded.address,
        &Address::generate(&env),
        &s.reserve.address,
        &s.beneficiary,
        &BATCH_BLOCKS,
        &0,
        &0,
    );
    s.acl.create_permission(
        &s.owner,
        &Entity::Account(s.operator.clone()),
        &mm.address,
        &OPEN_BUY_ORDER_ROLE,
        &s.owner,
    );
    assert!(!mm.is_open());
    assert!(matches!(
        mm.try_open_buy_order(&s.operator, &s.holder, &s.collateral, &1),
        Err(Ok(Error::InvalidState))
    ));
}

// ==================== Collateral management ====================

#[test]
fn test_collateral_whitelist() {
    let env = Env::default();
    let s = setup(&env);
    let config = s.mm.get_collateral_token(&s.collateral).unwrap();
    assert!(config.whitelisted);
    assert_eq!(config.reserve_ratio, RATIO);

    assert!(matches!(
        s.mm.try_add_collateral_token(&s.operator, &s.collateral, &0, &0, &RATIO, &0),
        Err(Ok(Error::CollateralAlreadyWhitelisted))
    ));

    let other = Address::generate(&env);
    assert!(matches!(
        s.mm.try_add_collateral_token(&s.operator, &other, &0, &0, &0, &0),
        Err(Ok(Error::InvalidConfig))
    ));
    assert!(matches!(
        s.mm.try_update_collateral_token(&s.operator, &other, &0, &0, &RATIO, &0),
        Err(Ok(Error::UnknownCollateralToken))
    ));

    s.mm
        .update_collateral_token(&s.operator, &s.collateral, &10, &20, &300_000, &5);
    let config = s.mm.get_collateral_token(&s.collateral).unwrap();
    assert_eq!(config.virtual_supply, 10);
    assert_eq!(config.virtual_balance, 20);
    assert_eq!(config.reserve_ratio, 300_000);
}

#[test]
fn test_governance_calls_are_role_gated() {
    let env = Env::default();
    let s = setup(&env);
    let stranger = Address::generate(&env);
    assert!(matches!(
        s.mm.try_update_fees(&stranger, &1, &1),
        Err(Ok(Error::Unauthorized))
    ));
    assert!(matches!(
        s.mm.try_update_beneficiary(&stranger, &stranger),
        Err(Ok(Error::Unauthorized))
    ));
    assert!(matches!(
        s.mm.try_remove_collateral_token(&stranger, &s.collateral),
        Err(Ok(Error::Unauthorized))
    ));
    assert!(matches!(
        s.mm.try_open_buy_order(&stranger, &stranger, &s.collateral, &10),
        Err(Ok(Error::Unauthorized))
    ));
}

#[test]
fn test_update_fees_and_beneficiary() {
    let env = Env::default();
    let s = setup(&env);
    let new_beneficiary = Address::generate(&env);
    s.mm.update_fees(&s.operator, &1_000, &2_000);
    s.mm.update_beneficiary(&s.operator, &new_beneficiary);
    let config = s.mm.get_config();
    assert_eq!(config.buy_fee, 1_000);
    assert_eq!(config.sell_fee, 2_000);
    assert_eq!(config.beneficiary, new_beneficiary);
    assert!(matches!(
        s.mm.try_update_fees(&s.operator, &1_000_000, &0),
        Err(Ok(Error::InvalidConfig))
    ));
}

#[test]
fn test_remove_collateral_with_pending_orders_fails() {
    let env = Env::default();
    let s = setup(&env);
    let buyer = Address::generate(&env);
    s.fund(&buyer, 1_000);
    let batch_id = s.mm.open_buy_order(&s.operator, &buyer, &s.collateral, &1_000);
    assert_eq!(s.mm.outstanding_orders(&s.collateral), 1);

    assert!(matches!(
        s.mm.try_remove_collateral_token(&s.operator, &s.collateral),
        Err(Ok(Error::PendingOrders))
    ));

    s.close_batch();
    s.mm.claim_buy_order(&buyer, &batch_id, &s.collateral);
    assert_eq!(s.mm.outstanding_orders(&s.collateral), 0);
    s.mm.remove_collateral_token(&s.operator, &s.collateral);
    assert_eq!(s.mm.get_collateral_token(&s.collateral), None);
    assert!(matches!(
        s.mm.try_open_buy_order(&s.operator, &buyer, &s.collateral, &1),
        Err(Ok(Error::UnknownCollateralToken))
    ));
}

#[test]
fn test_readded_collateral_uses_new_parameters() {
    let env = Env::default();
    let s = setup(&env);
    let buyer = Address::generate(&env);
    s.fund(&buyer, 2_000);
    let first = s.mm.open_buy_order(&s.operator, &buyer, &s.collateral, &1_000);
    s.close_batch();
    s.mm.claim_buy_order(&buyer, &first, &s.collateral);

    s.mm.remove_collateral_token(&s.operator, &s.collateral);
    s.mm
        .add_collateral_token(&s.operator, &s.collateral, &0, &0, &300_000, &NO_SLIPPAGE_LIMIT);
    let second = s.mm.open_buy_order(&s.operator, &buyer, &s.collateral, &1_000);
    assert_eq!(second, START + BATCH_BLOCKS);
    assert_eq!(
        s.mm.get_batch(&second, &s.collateral).unwrap().reserve_ratio,
        300_000
    );
    assert_eq!(
        s.mm.get_batch(&first, &s.collateral).unwrap().reserve_ratio,
        RATIO
    );
}

#[test]
fn test_unpriced_collateral_takes_no_orders() {
    let env = Env::default();
    let s = setup(&env);
    // nothing held in the reserve for this token and no virtual balance
    let empty = env
        .register_stellar_asset_contract_v2(s.owner.clone())
        .address();
    s.mm
        .add_collateral_token(&s.operator, &empty, &0, &0, &RATIO, &NO_SLIPPAGE_LIMIT);
    let buyer = Address::generate(&env);
    token::StellarAssetClient::new(&env, &empty).mint(&buyer, &1_000);

    assert!(matches!(
        s.mm.try_open_buy_order(&s.operator, &buyer, &empty, &1_000),
        Err(Ok(Error::InvalidState))
    ));
    assert!(matches!(
        s.mm.try_open_sell_order(&s.operator, &s.holder, &empty, &1_000),
        Err(Ok(Error::InvalidState))
    ));
    assert_eq!(token::Client::new(&env, &empty).balance(&buyer), 1_000);
    assert_eq!(s.reserve.balance(&empty), 0);
    assert_eq!(s.bonded.balance(&s.holder), SUPPLY);
    assert_eq!(s.mm.outstanding_orders(&empty), 0);
    assert_eq!(s.mm.get_batch(&START, &empty), None);

    s.mm.remove_collateral_token(&s.operator, &empty);
    assert_eq!(s.mm.get_collateral_token(&empty), None);
}

// ==================== Buy orders ====================

#[test]
fn test_buyers_in_the_same_batch_get_the_same_price() {
    let env = Env::default();
    let s = setup(&env);
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);
    s.fund(&alice, 1_000);
    s.fund(&bob, 1_000);

    let first = s.mm.open_buy_order(&s.operator, &alice, &s.collateral, &1_000);
    env.ledger().set_sequence_number(START + 5);
    let second = s.mm.open_buy_order(&s.operator, &bob, &s.collateral, &1_000);
    assert_eq!(first, START);
    assert_eq!(first, second);
    assert_eq!(s.reserve.balance(&s.collateral), BALANCE + 2_000);

    let batch = s.mm.get_batch(&first, &s.collateral).unwrap();
    assert_eq!(batch.supply, SUPPLY);
    assert_eq!(batch.balance, BALANCE);
    assert_eq!(batch.end, START + BATCH_BLOCKS);
    assert_eq!(batch.buyers, 2);
    assert_eq!(batch.total_buy_spend, 2_000);

    s.close_batch();
    let alice_tokens = s.mm.claim_buy_order(&alice, &first, &s.collateral);
    let bob_tokens = s.mm.claim_buy_order(&bob, &first, &s.collateral);
    assert_eq!(alice_tokens, bob_tokens);
    assert!(alice_tokens > 0);
    // the curve never beats the snapshot spot price of 2 tokens per collateral
    assert!(alice_tokens <= 2_000);
    assert_eq!(s.bonded.balance(&alice), alice_tokens);
    assert_eq!(s.mm.tokens_to_be_minted(), 0);
}

#[test]
fn test_repeated_orders_accumulate() {
    let env = Env::default();
    let s = setup(&env);
    let buyer = Address::generate(&env);
    s.fund(&buyer, 1_000);
    s.mm.open_buy_order(&s.operator, &buyer, &s.collateral, &400);
    let batch_id = s.mm.open_buy_order(&s.operator, &buyer, &s.collateral, &600);
    let order = s.mm.get_buy_order(&batch_id, &s.collateral, &buyer).unwrap();
    assert_eq!(order.amount, 1_000);
    assert_eq!(s.mm.get_batch(&batch_id, &s.collateral).unwrap().buyers, 1);
    assert_eq!(s.mm.outstanding_orders(&s.collateral), 1);
}

#[test]
fn test_claim_rules() {
    let env = Env::default();
    let s = setup(&env);
    let buyer = Address::generate(&env);
    s.fund(&buyer, 1_000);
    let batch_id = s.mm.open_buy_order(&s.operator, &buyer, &s.collateral, &1_000);

    assert!(matches!(
        s.mm.try_claim_buy_order(&buyer, &batch_id, &s.collateral),
        Err(Ok(Error::BatchNotClosed))
    ));
    assert!(matches!(
        s.mm.try_claim_buy_order(&buyer, &(batch_id + BATCH_BLOCKS), &s.collateral),
        Err(Ok(Error::BatchNotFound))
    ));

    s.close_batch();
    assert!(matches!(
        s.mm.try_claim_buy_order(&s.holder, &batch_id, &s.collateral),
        Err(Ok(Error::OrderNotFound))
    ));
    assert!(matches!(
        s.mm.try_claim_sell_order(&buyer, &batch_id, &s.collateral),
        Err(Ok(Error::OrderNotFound))
    ));
    s.mm.claim_buy_order(&buyer, &batch_id, &s.collateral);
    assert!(matches!(
        s.mm.try_claim_buy_order(&buyer, &batch_id, &s.collateral),
        Err(Ok(Error::AlreadyClaimed))
    ));
}

#[test]
fn test_last_claim_releases_dust() {
    let env = Env::default();
    let s = setup(&env);
    let buyers = [
        Address::generate(&env),
        Address::generate(&env),
        Address::generate(&env),
    ];
    for (i, buyer) in buyers.iter().enumerate() {
        s.fund(buyer, 10_000);
        s.mm
            .open_buy_order(&s.operator, buyer, &s.collateral, &(1_001 + i as i128 * 333));
    }
    s.close_batch();
    let mut minted = 0;
    for buyer in buyers.iter() {
        minted += s.mm.claim_buy_order(buyer, &START, &s.collateral);
    }
    let batch = s.mm.get_batch(&START, &s.collateral).unwrap();
    assert!(batch.settled);
    assert!(minted <= batch.total_buy_return);
    assert_eq!(batch.claimed_buy_return, minted);
    assert_eq!(s.mm.tokens_to_be_minted(), 0);
}

#[test]
fn test_next_batch_settles_previous_one() {
    let env = Env::default();
    let s = setup(&env);
    let buyer = Address::generate(&env);
    s.fund(&buyer, 2_000);
    s.mm.open_buy_order(&s.operator, &buyer, &s.collateral, &1_000);

    s.close_batch();
    let next = s.mm.open_buy_order(&s.operator, &buyer, &s.collateral, &1_000);
    assert_eq!(next, START + BATCH_BLOCKS);

    let previous = s.mm.get_batch(&START, &s.collateral).unwrap();
    assert!(previous.settled);
    assert_eq!(s.mm.tokens_to_be_minted(), previous.total_buy_return);

    // the new snapshot counts tokens owed to the previous batch
    let batch = s.mm.get_batch(&next, &s.collateral).unwrap();
    assert_eq!(batch.supply, SUPPLY + previous.total_buy_return);
    assert_eq!(batch.balance, BALANCE + 1_000);
}

#[test]
fn test_buy_slippage_limit() {
    let env = Env::default();
    let s = setup_with(&env, 0, 0, 100_000);
    let whale = Address::generate(&env);
    s.fund(&whale, BALANCE);
    // doubling the balance moves the price far beyond 10%
    assert!(matches!(
        s.mm.try_open_buy_order(&s.operator, &whale, &s.collateral, &BALANCE),
        Err(Ok(Error::SlippageExceeded))
    ));
    s.mm.open_buy_order(&s.operator, &whale, &s.collateral, &1_000);
}

// ==================== Sell orders ====================

#[test]
fn test_sell_order_burns_and_pays_from_reserve() {
    let env = Env::default();
    let s = setup(&env);
    let batch_id = s.mm.open_sell_order(&s.operator, &s.holder, &s.collateral, &10_000);
    assert_eq!(s.bonded.balance(&s.holder), SUPPLY - 10_000);
    assert_eq!(s.bonded.total_supply(), SUPPLY - 10_000);

    assert!(matches!(
        s.mm.try_claim_sell_order(&s.holder, &batch_id, &s.collateral),
        Err(Ok(Error::BatchNotClosed))
    ));
    s.close_batch();
    let paid = s.mm.claim_sell_order(&s.holder, &batch_id, &s.collateral);
    assert!(paid > 0);
    // at most the spot price of 0.5 collateral per token
    assert!(paid <= 5_000);
    assert_eq!(s.collateral_balance(&s.holder), paid);
    assert_eq!(s.reserve.balance(&s.collateral), BALANCE - paid);
    assert_eq!(s.mm.collateral_to_be_claimed(&s.collateral), 0);
}

#[test]
fn test_sell_more_than_held_fails() {
    let env = Env::default();
    let s = setup(&env);
    let seller = Address::generate(&env);
    assert!(s
        .mm
        .try_open_sell_order(&s.operator, &seller, &s.collateral, &1)
        .is_err());
}

// ==================== Fees ====================

#[test]
fn test_fees_go_to_beneficiary() {
    let env = Env::default();
    let s = setup_with(&env, 10_000, 20_000, NO_SLIPPAGE_LIMIT);
    let buyer = Address::generate(&env);
    s.fund(&buyer, 100_000);

    let batch_id = s.mm.open_buy_order(&s.operator, &buyer, &s.collateral, &100_000);
    assert_eq!(s.collateral_balance(&s.beneficiary), 1_000);
    assert_eq!(s.reserve.balance(&s.collateral), BALANCE + 99_000);
    assert_eq!(
        s.mm.get_buy_order(&batch_id, &s.collateral, &buyer)
            .unwrap()
            .amount,
        99_000
    );

    s.mm.open_sell_order(&s.operator, &s.holder, &s.collateral, &100_000);
    s.close_batch();
    s.mm.claim_buy_order(&buyer, &batch_id, &s.collateral);
    let batch = s.mm.get_batch(&batch_id, &s.collateral).unwrap();
    let net = s.mm.claim_sell_order(&s.holder, &batch_id, &s.collateral);

    let fee = batch.total_sell_return * 20_000 / 1_000_000;
    assert_eq!(net, batch.total_sell_return - fee);
    assert_eq!(s.collateral_balance(&s.beneficiary), 1_000 + fee);
    assert_eq!(s.collateral_balance(&s.holder), net);
}
