#![allow(clippy::unwrap_used)]

use fundraising_common::{Error, PresaleState, PPM};
use fundraising_tests::assert_contract_error;
use fundraising_tests::utils::{constants::*, Fundraising};
use soroban_sdk::{testutils::Ledger, Env};

#[test]
fn test_contribution_mints_at_fixed_rate() {
    let env = Env::default();
    let f = Fundraising::new(&env);
    f.controller.open_presale(&f.deployer);

    let alice = f.funded_account(5_000);
    f.controller.contribute(&alice, &1_234);

    let expected = 1_234 * EXCHANGE_RATE as i128 / PPM as i128;
    assert_eq!(f.bonded.balance(&alice), expected);
    assert_eq!(f.presale.total_sold(), expected);
    assert_eq!(f.collateral_balance(&f.presale.address), 1_234);
}

#[test]
fn test_contributions_add_up_to_total_raised() {
    let env = Env::default();
    let f = Fundraising::new(&env);
    f.controller.open_presale(&f.deployer);

    let contributors = [
        (f.funded_account(10_000), 700),
        (f.funded_account(10_000), 2_500),
        (f.funded_account(10_000), 41),
    ];
    for (who, amount) in contributors.iter() {
        f.controller.contribute(who, amount);
        f.controller.contribute(who, amount);
    }

    let sum: i128 = contributors
        .iter()
        .map(|(who, _)| f.presale.contribution_of(who))
        .sum();
    assert_eq!(sum, f.presale.total_raised());
    assert_eq!(sum, 2 * (700 + 2_500 + 41));
    assert_eq!(f.presale.contributors_counter(), 3);
}

#[test]
fn test_finished_is_reached_without_a_transaction() {
    let env = Env::default();
    let f = Fundraising::new(&env);
    assert_eq!(f.controller.presale_state(), PresaleState::Pending);
    f.controller.open_presale(&f.deployer);
    assert_eq!(f.controller.presale_state(), PresaleState::Funding);

    env.ledger().set_timestamp(START_TIME + PRESALE_PERIOD - 1);
    assert_eq!(f.presale.state(), PresaleState::Funding);
    f.end_presale();
    assert_eq!(f.presale.state(), PresaleState::Finished);

    let late = f.funded_account(100);
    assert_contract_error!(f.controller.try_contribute(&late, &100), Error::InvalidState);
}

#[test]
fn test_close_runs_exactly_once() {
    let env = Env::default();
    let f = Fundraising::new(&env);
    let alice = f.funded_account(8_000);
    f.run_presale(&[(&alice, 8_000)]);

    assert_eq!(f.presale.state(), PresaleState::Closed);
    assert!(f.market_maker.is_open());
    assert_contract_error!(f.controller.try_close_presale(), Error::InvalidState);
    assert_contract_error!(f.presale.try_close_presale(), Error::InvalidState);
}

#[test]
fn test_close_funds_reserve_and_beneficiary() {
    let env = Env::default();
    let f = Fundraising::new(&env);
    let alice = f.funded_account(8_000);
    f.run_presale(&[(&alice, 8_000)]);

    // 8_000 * 20% / 80%
    assert_eq!(f.bonded.balance(&f.beneficiary), 2_000);
    // 8_000 / 80% * 10%
    assert_eq!(f.reserve.balance(f.collateral()), 1_000);
    assert_eq!(f.collateral_balance(&f.beneficiary), 7_000);
    assert_eq!(f.collateral_balance(&f.presale.address), 0);
    assert_eq!(f.bonded.total_supply(), 16_000 + 2_000);
}
