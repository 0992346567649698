//! One-shot migration of a finalized curve into a venue pool
//!
//! Runs inside the buy that crosses the cap, after the curve has latched
//! `finalized`. The sequence takes the protocol fee, mints the asset up to
//! its fixed total supply, wraps the remaining native value, opens a pool at
//! the curve's final marginal price and deposits both sides across the full
//! tick range. Whatever the deposit leaves behind is burned (asset) or
//! returned to the fee recipient (native).

use ascent_math::{encode_sqrt_price_x96, mul_div, MathError, Rounding, U256, WAD};
use ascent_types::{
    scale_to_ledger, Address, CurveConfig, CurveError, CurveEvent, CurveFinalized, CurveResult,
    LiquiditySnapshot, MigrationRecord, SnapshotStage,
};
use tracing::{debug, info};

use crate::host::{FungibleToken, HostFacets, MintParams};
use crate::pricing::CurvePricing;

/// Finalization sequence for one curve
pub struct LiquidityMigrator<'a> {
    curve: Address,
    config: &'a CurveConfig,
    pricing: &'a CurvePricing,
}

impl<'a> LiquidityMigrator<'a> {
    pub fn new(curve: Address, config: &'a CurveConfig, pricing: &'a CurvePricing) -> Self {
        Self {
            curve,
            config,
            pricing,
        }
    }

    /// Run the migration for a curve with `circulating_supply` whole units
    /// outstanding and `net_raised` collected. Records are appended to
    /// `events` in emission order.
    pub fn migrate(
        &self,
        host: HostFacets<'_>,
        circulating_supply: u128,
        net_raised: u128,
        events: &mut Vec<CurveEvent>,
    ) -> CurveResult<MigrationRecord> {
        let HostFacets {
            bank,
            ledger,
            wrapped,
            venue,
        } = host;
        let curve = self.curve;

        // Protocol fee
        let held = bank.balance_of(curve);
        let protocol_fee = mul_div(held, self.config.protocol_fee_percent, WAD, Rounding::Down)?;
        if protocol_fee > 0 {
            bank.transfer(curve, self.config.fee_recipient, protocol_fee)
                .map_err(CurveError::FeeTransferFailed)?;
        }
        let remaining = held - protocol_fee;
        debug!("Migration fee: held={} fee={} remaining={}", held, protocol_fee, remaining);

        // Mint up to the fixed total supply
        let unit = scale_to_ledger(1, ledger.decimals()).ok_or(MathError::ResultOverflow)?;
        let target = scale_to_ledger(self.config.target_total_supply, ledger.decimals())
            .ok_or(MathError::ResultOverflow)?;
        let minted = ledger.total_supply();
        let supply_minted = target
            .checked_sub(minted)
            .ok_or(CurveError::SupplyTargetExceeded { minted, target })?;
        if supply_minted > 0 {
            ledger
                .mint(curve, curve, supply_minted)
                .map_err(CurveError::TransferFailed)?;
        }

        // Wrap and approve both sides
        if remaining > 0 {
            wrapped
                .deposit(&mut *bank, curve, remaining)
                .map_err(CurveError::TransferFailed)?;
        }
        let asset_amount = ledger.balance_of(curve);
        let wrapped_amount = wrapped.balance_of(curve);
        let spender = venue.address();
        ledger
            .approve(curve, spender, asset_amount)
            .map_err(CurveError::TransferFailed)?;
        wrapped
            .approve(curve, spender, wrapped_amount)
            .map_err(CurveError::TransferFailed)?;

        events.push(
            LiquiditySnapshot {
                stage: SnapshotStage::PreDeposit,
                native_balance: bank.balance_of(curve),
                asset_balance: asset_amount,
                wrapped_balance: wrapped_amount,
                asset_total_supply: ledger.total_supply(),
            }
            .into(),
        );

        // Pool at the final marginal price, oriented by token order
        let asset = ledger.address();
        let native = wrapped.address();
        let asset_is_token0 = asset < native;
        let marginal = self.pricing.marginal_price(circulating_supply)?;
        let sqrt_price_x96 = if asset_is_token0 {
            initial_sqrt_price(marginal, unit)?
        } else {
            initial_sqrt_price(unit, marginal)?
        };
        let (token0, token1, amount0_desired, amount1_desired) = if asset_is_token0 {
            (asset, native, asset_amount, wrapped_amount)
        } else {
            (native, asset, wrapped_amount, asset_amount)
        };

        let fee = self.config.fee_tier.fee();
        let pool = venue
            .create_and_initialize_pool_if_necessary(token0, token1, fee, sqrt_price_x96)
            .map_err(|rejection| CurveError::PoolInitFailed(rejection.reason))?;
        if pool.is_zero() {
            return Err(CurveError::PoolInitFailed(
                "venue returned a null pool".to_string(),
            ));
        }
        debug!("Pool {} at sqrt price {}", pool, sqrt_price_x96);

        // Full-range deposit
        let (tick_lower, tick_upper) = self.config.fee_tier.full_range_ticks();
        let params = MintParams {
            token0,
            token1,
            fee,
            tick_lower,
            tick_upper,
            amount0_desired,
            amount1_desired,
            amount0_min: 0,
            amount1_min: 0,
            recipient: curve,
        };
        let asset_token: &mut dyn FungibleToken = ledger.as_fungible();
        let native_token: &mut dyn FungibleToken = wrapped.as_fungible();
        let receipt = if asset_is_token0 {
            venue.mint(curve, asset_token, native_token, &params)
        } else {
            venue.mint(curve, native_token, asset_token, &params)
        }
        .map_err(CurveError::PositionMintFailed)?;

        events.push(
            LiquiditySnapshot {
                stage: SnapshotStage::PostDeposit,
                native_balance: bank.balance_of(curve),
                asset_balance: ledger.balance_of(curve),
                wrapped_balance: wrapped.balance_of(curve),
                asset_total_supply: ledger.total_supply(),
            }
            .into(),
        );

        // Dust
        let asset_dust_burned = ledger.balance_of(curve);
        if asset_dust_burned > 0 {
            ledger
                .burn(curve, curve, asset_dust_burned)
                .map_err(CurveError::DustTransferFailed)?;
        }
        let native_dust_returned = wrapped.balance_of(curve);
        if native_dust_returned > 0 {
            wrapped
                .withdraw(&mut *bank, curve, native_dust_returned)
                .map_err(CurveError::DustTransferFailed)?;
            bank.transfer(curve, self.config.fee_recipient, native_dust_returned)
                .map_err(CurveError::DustTransferFailed)?;
        }

        events.push(
            CurveFinalized {
                position_id: receipt.position_id,
                net_raised,
                amount0: receipt.amount0,
                amount1: receipt.amount1,
                liquidity: receipt.liquidity,
            }
            .into(),
        );

        info!(
            "Curve {} migrated: pool={} position={} liquidity={} fee={} asset_dust={} native_dust={}",
            curve,
            pool,
            receipt.position_id,
            receipt.liquidity,
            protocol_fee,
            asset_dust_burned,
            native_dust_returned
        );

        Ok(MigrationRecord {
            pool,
            token0,
            token1,
            sqrt_price_x96,
            position_id: receipt.position_id,
            liquidity: receipt.liquidity,
            amount0: receipt.amount0,
            amount1: receipt.amount1,
            protocol_fee,
            supply_minted,
            asset_dust_burned,
            native_dust_returned,
        })
    }
}

/// Q64.96 sqrt of `token1_per_whole / token0_per_whole`, both in base units
/// per whole asset unit
fn initial_sqrt_price(token1_amount: u128, token0_amount: u128) -> CurveResult<U256> {
    Ok(encode_sqrt_price_x96(token1_amount, token0_amount)?)
}
