//! Shared fixtures for the simulation integration tests

#![allow(dead_code)]

pub mod tracing;

use std::rc::Rc;

use ascent_core::BondingCurve;
use ascent_simulation::{ChainLayout, InMemoryChain, ReceiveHook};
use ascent_types::{Address, CurveConfig, FeeTier, Rejection, WAD};

pub const P0: u128 = 4_900_000_000;
pub const RATIO: u128 = 1_000_000_003_180_000_000;
pub const CAP: u128 = 6_000_000_000_000_000_000;

/// Whole units per lot when driving a curve to its cap
pub const LOT: u128 = 50_000_000;

pub fn curve_address() -> Address {
    Address::from_low_u64(0xc0ffee)
}

pub fn fee_recipient() -> Address {
    Address::from_low_u64(0xfee)
}

pub fn trader(n: u64) -> Address {
    Address::from_low_u64(0x7ade_0000 + n)
}

pub fn reference_config() -> CurveConfig {
    CurveConfig::new(P0, RATIO, CAP, fee_recipient())
        .with_fee_tier(FeeTier::Medium)
        .with_protocol_fee_percent(WAD / 20)
}

/// Chain with a launched reference curve and two funded traders
pub fn setup() -> (InMemoryChain, BondingCurve) {
    setup_with(ChainLayout::default(), reference_config())
}

pub fn setup_with(layout: ChainLayout, config: CurveConfig) -> (InMemoryChain, BondingCurve) {
    self::tracing::init_test_tracing();
    let mut chain = InMemoryChain::with_layout(layout, 18);
    let curve = chain.launch_curve(curve_address(), config).unwrap();
    chain.fund(trader(1), 100 * WAD);
    chain.fund(trader(2), 100 * WAD);
    (chain, curve)
}

/// Layout where the asset sorts after the wrapped native token
pub fn asset_last_layout() -> ChainLayout {
    let mut high = [0xffu8; 20];
    high[0] = 0xa5;
    ChainLayout {
        asset: Address::new(high),
        ..ChainLayout::default()
    }
}

/// Receive hook that turns every incoming transfer away
pub fn refusing_hook(reason: &'static str) -> ReceiveHook {
    Rc::new(move |_: Address, _: u128| Err(Rejection::new(reason)))
}

/// Buy `amount` paying the exact quote
pub fn buy_exact(chain: &mut InMemoryChain, curve: &BondingCurve, buyer: Address, amount: u128) -> u128 {
    let cost = curve.quote_buy(amount).unwrap();
    curve.buy(chain, buyer, amount, cost).unwrap()
}

/// Buy lots of `LOT` until one of them fails or the curve is one lot from
/// its cap. Returns the number of lots bought.
pub fn buy_until_next_lot_crosses(chain: &mut InMemoryChain, curve: &BondingCurve, buyer: Address) -> usize {
    let mut lots = 0;
    loop {
        let cost = curve.quote_buy(LOT).unwrap();
        if curve.net_raised() + cost >= CAP {
            return lots;
        }
        curve.buy(chain, buyer, LOT, cost).unwrap();
        lots += 1;
    }
}
