//! Property tests for the curve pricing engine

use ascent_core::CurvePricing;
use ascent_math::WAD;
use ascent_types::{Address, CurveConfig, MIN_PRICE_STEP};
use proptest::prelude::*;

const P0: u128 = 4_900_000_000;
const RATIO: u128 = 1_000_000_003_180_000_000;
const CAP: u128 = 6_000_000_000_000_000_000;

/// Smallest initial price whose first step reaches `MIN_PRICE_STEP`
fn smallest_initial_price(excess: u128) -> u128 {
    (MIN_PRICE_STEP * WAD).div_ceil(excess)
}

fn config_at(initial_price: u128, excess: u128) -> CurveConfig {
    CurveConfig::new(initial_price, WAD + excess, CAP, Address::from_low_u64(0xfee))
}

prop_compose! {
    /// Configurations at or just above the smallest accepted price step
    fn boundary_config_strategy()(
        excess in 1u128..10_000_000_000_000u128,
        slack in 0u128..4,
    ) -> CurveConfig {
        config_at(smallest_initial_price(excess) + slack, excess)
    }
}

prop_compose! {
    fn pricing_strategy()(
        initial_price in P0..1_000_000_000_000_000u128,
        excess in 3_180_000_000u128..1_000_000_000_000u128,
    ) -> CurvePricing {
        CurvePricing::new(initial_price, WAD + excess).unwrap()
    }
}

fn reference_curve() -> CurvePricing {
    CurvePricing::new(P0, RATIO).unwrap()
}

proptest! {
    #[test]
    fn first_unit_costs_initial_price(
        initial_price in 1u128..1_000_000_000_000_000_000_000u128,
        excess in 1u128..WAD,
    ) {
        let engine = CurvePricing::new(initial_price, WAD + excess).unwrap();
        prop_assert_eq!(engine.buy_price(0, 1).unwrap(), initial_price);
    }

    #[test]
    fn unit_price_increases_with_supply(supply in 0u128..1_000_000_000u128) {
        let engine = reference_curve();
        let here = engine.buy_price(supply, 1).unwrap();
        let next = engine.buy_price(supply + 1, 1).unwrap();
        prop_assert!(here < next);
    }

    #[test]
    fn unit_price_increases_with_supply_for_any_curve(
        engine in pricing_strategy(),
        supply in 0u128..10_000_000u128,
    ) {
        prop_assert!(engine.buy_price(supply, 1).unwrap() < engine.buy_price(supply + 1, 1).unwrap());
    }

    #[test]
    fn accepted_configs_raise_the_unit_price(
        config in boundary_config_strategy(),
        supply in 0u128..1_000_000u128,
    ) {
        prop_assert!(config.validate().is_ok());
        let engine = CurvePricing::from_config(&config).unwrap();
        prop_assert!(engine.buy_price(supply, 1).unwrap() < engine.buy_price(supply + 1, 1).unwrap());
    }

    #[test]
    fn configs_below_the_smallest_step_are_rejected(excess in 1u128..10_000_000_000_000u128) {
        let config = config_at(smallest_initial_price(excess) - 1, excess);
        prop_assert!(config.validate().is_err());
    }

    #[test]
    fn cost_increases_with_amount(
        supply in 0u128..1_000_000_000u128,
        amount in 1u128..100_000_000u128,
    ) {
        let engine = reference_curve();
        prop_assert!(engine.buy_price(supply, 1).unwrap() < engine.buy_price(supply, 2).unwrap());
        prop_assert!(
            engine.buy_price(supply, amount).unwrap() < engine.buy_price(supply, amount + 1).unwrap()
        );
    }

    #[test]
    fn sell_refund_grows_with_amount(supply in 2u128..1_000_000_000u128) {
        let engine = reference_curve();
        prop_assert!(engine.sell_price(supply, 1).unwrap() <= engine.sell_price(supply, 2).unwrap());
    }

    #[test]
    fn buy_then_sell_refunds_at_most_cost(
        engine in pricing_strategy(),
        supply in 0u128..10_000_000u128,
        amount in 1u128..1_000_000u128,
    ) {
        let cost = engine.buy_price(supply, amount).unwrap();
        let refund = engine.sell_price(supply + amount, amount).unwrap();
        prop_assert!(refund <= cost);
    }

    #[test]
    fn sell_matches_total_cost_difference(
        supply in 1u128..1_000_000_000u128,
        amount in 1u128..1_000_000u128,
    ) {
        let engine = reference_curve();
        let amount = amount.min(supply);
        let refund = engine.sell_price(supply, amount).unwrap();
        let difference = engine.total_cost(supply).unwrap() - engine.total_cost(supply - amount).unwrap();
        // Both sides round independently
        let gap = refund.abs_diff(difference);
        prop_assert!(gap <= difference / 1_000_000_000 + 4, "refund {} vs {}", refund, difference);
    }
}

#[test]
fn reference_curve_first_purchase() {
    assert_eq!(reference_curve().buy_price(0, 1).unwrap(), 4_900_000_000);
}

#[test]
fn later_lots_cost_more() {
    let engine = reference_curve();
    let cost = engine.buy_price(0, 1_000_000).unwrap();
    // Every unit after the first costs more than p0
    assert!(cost > P0 * 1_000_000);
    assert!(engine.buy_price(1_000_000, 1_000_000).unwrap() > cost);
}
