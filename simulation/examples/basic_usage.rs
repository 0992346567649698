/// Basic usage example for the Ascent simulation framework
///
/// This example demonstrates:
/// - Launching a curve on the in-memory chain
/// - Quoting, buying and selling against it
/// - Driving it past its cap and inspecting the migrated pool
use ascent_simulation::{InMemoryChain, SimulationResult};
use ascent_types::{Address, CurveConfig, CurveEvent, FeeTier, WAD};

fn main() -> SimulationResult<()> {
    println!("Ascent Bonding Curve - Basic Usage");
    println!("==================================\n");

    // Step 1: Launch a curve
    let config = CurveConfig::new(
        4_900_000_000,
        1_000_000_003_180_000_000,
        6 * WAD,
        Address::from_low_u64(0xfee),
    )
    .with_fee_tier(FeeTier::Medium)
    .with_protocol_fee_percent(WAD / 20);

    let mut chain = InMemoryChain::new();
    let curve = chain.launch_curve(Address::from_low_u64(0xc0ffee), config)?;
    println!("1. Curve {} launched", curve.address());
    println!("   - First unit costs {}\n", curve.quote_buy(1)?);

    // Step 2: Buy and sell
    let alice = Address::from_low_u64(1);
    chain.fund(alice, 100 * WAD);

    let cost = curve.buy(&mut chain, alice, 1_000_000, curve.quote_buy(1_000_000)?)?;
    println!("2. Alice bought 1,000,000 units for {}", cost);

    let scaled = 400_000 * WAD;
    chain
        .approve_asset(alice, curve.address(), scaled)
        .map_err(ascent_types::CurveError::TransferFailed)?;
    let refund = curve.sell(&mut chain, alice, 400_000)?;
    println!("   - Sold 400,000 back for {}", refund);
    println!("   - Circulating supply: {}\n", curve.circulating_supply());

    // Step 3: Buy in lots until the curve finalizes
    let mut lots = 0;
    while !curve.is_finalized() {
        let quote = curve.quote_buy(50_000_000)?;
        curve.buy(&mut chain, alice, 50_000_000, quote)?;
        lots += 1;
    }
    println!("3. Finalized after {} lots, net raised {}", lots, curve.net_raised());

    // Step 4: Inspect the migration
    if let Some(migration) = curve.state().migration {
        println!("4. Pool {} / position {}", migration.pool, migration.position_id);
        println!("   - Liquidity: {}", migration.liquidity);
        println!("   - Protocol fee: {}", migration.protocol_fee);
        println!("   - Asset dust burned: {}", migration.asset_dust_burned);
    }

    for event in curve.events() {
        if let CurveEvent::Finalized(finalized) = event {
            println!("   - Finalized event: amount0={} amount1={}", finalized.amount0, finalized.amount1);
        }
    }

    Ok(())
}
