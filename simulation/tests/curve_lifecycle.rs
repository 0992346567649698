//! Buy and sell transitions against the in-memory chain

mod common;

use ascent_core::{CurveHost, FungibleToken, NativeBank};
use ascent_types::{CurveError, CurveEvent, CurvePhase, TokensPurchased, TokensSold, WAD};
use common::*;

#[test]
fn test_first_purchase_costs_initial_price() {
    let (mut chain, curve) = setup();
    assert_eq!(curve.get_buy_price(0, 1).unwrap(), 4_900_000_000);

    let cost = curve.buy(&mut chain, trader(1), 1, P0).unwrap();
    assert_eq!(cost, P0);
    assert_eq!(curve.circulating_supply(), 1);
    assert_eq!(curve.net_raised(), P0);
    assert_eq!(chain.asset_balance(trader(1)), WAD);
    assert_eq!(chain.native_balance(curve_address()), P0);
    assert_eq!(chain.native_balance(trader(1)), 100 * WAD - P0);
    assert_eq!(
        curve.events(),
        vec![CurveEvent::Buy(TokensPurchased {
            buyer: trader(1),
            amount: 1,
            cost: P0,
        })]
    );
}

#[test]
fn test_buy_refunds_excess_payment() {
    let (mut chain, curve) = setup();
    let cost = curve.quote_buy(1_000).unwrap();

    let charged = curve.buy(&mut chain, trader(1), 1_000, cost + 12_345).unwrap();
    assert_eq!(charged, cost);
    assert_eq!(chain.native_balance(trader(1)), 100 * WAD - cost);
    assert_eq!(chain.native_balance(curve_address()), cost);
    assert_eq!(curve.net_raised(), cost);
}

#[test]
fn test_insufficient_payment_rejected() {
    let (mut chain, curve) = setup();
    buy_exact(&mut chain, &curve, trader(1), 3_000_000);
    let before = curve.state();
    let balance = chain.native_balance(trader(2));

    let cost = curve.get_buy_price(curve.circulating_supply(), 1_000_000).unwrap();
    assert_eq!(
        curve.buy(&mut chain, trader(2), 1_000_000, cost - 1),
        Err(CurveError::InsufficientPayment {
            required: cost,
            provided: cost - 1,
        })
    );
    assert_eq!(curve.state(), before);
    assert_eq!(chain.native_balance(trader(2)), balance);
    assert_eq!(curve.events().len(), 1);
}

#[test]
fn test_zero_amounts_rejected() {
    let (mut chain, curve) = setup();
    assert_eq!(curve.buy(&mut chain, trader(1), 0, WAD), Err(CurveError::InvalidAmount));
    assert_eq!(curve.sell(&mut chain, trader(1), 0), Err(CurveError::InvalidAmount));
    assert_eq!(chain.native_balance(trader(1)), 100 * WAD);
}

#[test]
fn test_payment_beyond_balance_fails_transfer() {
    let (mut chain, curve) = setup();
    let poor = trader(9);
    chain.fund(poor, P0 - 1);

    // Attached value is checked against the cost, then collected
    let result = curve.buy(&mut chain, poor, 1, P0);
    assert!(matches!(result, Err(CurveError::TransferFailed(_))));
    assert_eq!(curve.circulating_supply(), 0);
    assert_eq!(chain.native_balance(poor), P0 - 1);
}

#[test]
fn test_sell_burns_and_refunds() {
    let (mut chain, curve) = setup();
    buy_exact(&mut chain, &curve, trader(1), 1_000_000);
    let net_raised = curve.net_raised();
    let expected = curve.quote_sell(400_000).unwrap();
    let balance = chain.native_balance(trader(1));

    chain
        .approve_asset(trader(1), curve_address(), 400_000 * WAD)
        .unwrap();
    let refund = curve.sell(&mut chain, trader(1), 400_000).unwrap();

    assert_eq!(refund, expected);
    assert_eq!(curve.circulating_supply(), 600_000);
    assert_eq!(curve.net_raised(), net_raised);
    assert_eq!(chain.native_balance(trader(1)), balance + refund);
    assert_eq!(chain.asset_balance(trader(1)), 600_000 * WAD);
    assert_eq!(chain.asset_balance(curve_address()), 0);
    assert_eq!(chain.ledger().total_supply(), 600_000 * WAD);
    assert_eq!(chain.ledger().allowance(trader(1), curve_address()), 0);
    assert_eq!(
        curve.events().last(),
        Some(&CurveEvent::Sell(TokensSold {
            seller: trader(1),
            amount: 400_000,
            refund,
        }))
    );
}

#[test]
fn test_sell_without_approval_reverts() {
    let (mut chain, curve) = setup();
    buy_exact(&mut chain, &curve, trader(1), 1_000);
    let before = curve.state();
    let events = curve.events();

    let result = curve.sell(&mut chain, trader(1), 10);
    assert!(matches!(result, Err(CurveError::TransferFailed(_))));
    assert_eq!(curve.state(), before);
    assert_eq!(curve.events(), events);
    assert_eq!(chain.asset_balance(trader(1)), 1_000 * WAD);
}

#[test]
fn test_no_oversell() {
    let (mut chain, curve) = setup();
    buy_exact(&mut chain, &curve, trader(1), 500);
    chain
        .approve_asset(trader(1), curve_address(), u128::MAX)
        .unwrap();

    let supply = curve.circulating_supply();
    assert_eq!(
        curve.sell(&mut chain, trader(1), supply + 1),
        Err(CurveError::InsufficientSupply {
            requested: supply + 1,
            available: supply,
        })
    );
    assert_eq!(curve.circulating_supply(), supply);
}

#[test]
fn test_selling_units_held_by_another_trader_fails() {
    let (mut chain, curve) = setup();
    buy_exact(&mut chain, &curve, trader(1), 500);
    chain
        .approve_asset(trader(2), curve_address(), u128::MAX)
        .unwrap();

    let result = curve.sell(&mut chain, trader(2), 100);
    assert!(matches!(result, Err(CurveError::TransferFailed(_))));
    assert_eq!(curve.circulating_supply(), 500);
}

#[test]
fn test_insufficient_reserve() {
    let (mut chain, curve) = setup();
    buy_exact(&mut chain, &curve, trader(1), 1_000);
    chain
        .approve_asset(trader(1), curve_address(), u128::MAX)
        .unwrap();

    // Drain the curve behind its back
    let held = chain.native_balance(curve_address());
    chain
        .facets()
        .bank
        .transfer(curve_address(), trader(2), held - 1)
        .unwrap();

    let refund = curve.quote_sell(1_000).unwrap();
    assert_eq!(
        curve.sell(&mut chain, trader(1), 1_000),
        Err(CurveError::InsufficientReserve {
            required: refund,
            available: 1,
        })
    );
    assert_eq!(curve.circulating_supply(), 1_000);
}

#[test]
fn test_round_trip_never_profits() {
    let (mut chain, curve) = setup();
    buy_exact(&mut chain, &curve, trader(2), 7_654_321);
    chain
        .approve_asset(trader(1), curve_address(), u128::MAX)
        .unwrap();

    for amount in [1, 999, 1_000_000, 25_000_000] {
        let before = chain.native_balance(trader(1));
        let cost = buy_exact(&mut chain, &curve, trader(1), amount);
        let refund = curve.sell(&mut chain, trader(1), amount).unwrap();
        assert!(refund <= cost, "amount {}: refund {} > cost {}", amount, refund, cost);
        assert!(chain.native_balance(trader(1)) <= before);
    }
}

#[test]
fn test_ledger_supply_tracks_circulating_supply() {
    let (mut chain, curve) = setup();
    chain
        .approve_asset(trader(1), curve_address(), u128::MAX)
        .unwrap();

    buy_exact(&mut chain, &curve, trader(1), 10_000);
    buy_exact(&mut chain, &curve, trader(2), 2_500);
    curve.sell(&mut chain, trader(1), 4_000).unwrap();
    buy_exact(&mut chain, &curve, trader(1), 1);

    assert_eq!(curve.circulating_supply(), 8_501);
    assert_eq!(chain.ledger().total_supply(), curve.circulating_supply() * WAD);
    assert_eq!(curve.phase(), CurvePhase::Active);
}

#[test]
fn test_failed_operations_leave_no_checkpoints() {
    let (mut chain, curve) = setup();
    buy_exact(&mut chain, &curve, trader(1), 10);
    let _ = curve.buy(&mut chain, trader(1), 10, 0);
    let _ = curve.sell(&mut chain, trader(1), 10);
    assert_eq!(chain.checkpoint_depth(), 0);

    // The host is still usable for checkpoints of its own
    let id = chain.snapshot();
    chain.release(id);
    assert_eq!(chain.checkpoint_depth(), 0);
}
