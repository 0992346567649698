/// In-memory concentrated-liquidity position manager
///
/// Pools hold a price and aggregate liquidity; only full-range positions are
/// accepted. Over the full range a position behaves like a constant-product
/// reserve: `amount0 = L / √P` and `amount1 = L · √P`, with `√P` in Q64.96.

use std::collections::BTreeMap;

use ascent_core::{FungibleToken, HostResult, MintParams, MintReceipt, PositionManager};
use ascent_math::{mul_div_u256, u256_to_u128, Rounding, MAX_SQRT_RATIO, MIN_SQRT_RATIO, Q96, U256};
use ascent_types::{Address, FeeTier, Rejection};
use serde::Serialize;
use tracing::debug;

/// Seed for generated pool addresses
const POOL_ADDRESS_BASE: u64 = 0x9000_0000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolState {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    #[serde(with = "ascent_types::amount_serde::decimal_u256")]
    pub sqrt_price_x96: U256,
    pub liquidity: u128,
    pub reserve0: u128,
    pub reserve1: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub id: u64,
    pub pool: Address,
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub amount0: u128,
    pub amount1: u128,
}

/// Injected failures for exercising the migrator's error paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VenueFaults {
    pub reject_pool_creation: bool,
    pub return_null_pool: bool,
    pub reject_mint: bool,
}

#[derive(Debug, Clone)]
pub struct InMemoryVenue {
    address: Address,
    pools: BTreeMap<(Address, Address, u32), PoolState>,
    positions: Vec<Position>,
    pub faults: VenueFaults,
}

impl InMemoryVenue {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            pools: BTreeMap::new(),
            positions: Vec::new(),
            faults: VenueFaults::default(),
        }
    }

    pub fn pool(&self, token0: Address, token1: Address, fee: u32) -> Option<&PoolState> {
        self.pools.get(&(token0, token1, fee))
    }

    pub fn pools(&self) -> impl Iterator<Item = &PoolState> {
        self.pools.values()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn position(&self, id: u64) -> Option<&Position> {
        self.positions.iter().find(|position| position.id == id)
    }
}

impl PositionManager for InMemoryVenue {
    fn address(&self) -> Address {
        self.address
    }

    fn create_and_initialize_pool_if_necessary(
        &mut self,
        token0: Address,
        token1: Address,
        fee: u32,
        sqrt_price_x96: U256,
    ) -> HostResult<Address> {
        if self.faults.reject_pool_creation {
            return Err(Rejection::new("pool creation disabled"));
        }
        if self.faults.return_null_pool {
            return Ok(Address::ZERO);
        }
        if token0 >= token1 {
            return Err(Rejection::new("tokens must be strictly ordered"));
        }
        FeeTier::try_from(fee).map_err(|e| Rejection::new(e.to_string()))?;

        // An existing pool keeps its price
        if let Some(pool) = self.pools.get(&(token0, token1, fee)) {
            return Ok(pool.address);
        }

        if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
            return Err(Rejection::new(format!(
                "sqrt price {} outside the supported range",
                sqrt_price_x96
            )));
        }

        let address = Address::from_low_u64(POOL_ADDRESS_BASE + self.pools.len() as u64);
        self.pools.insert(
            (token0, token1, fee),
            PoolState {
                address,
                token0,
                token1,
                fee,
                sqrt_price_x96,
                liquidity: 0,
                reserve0: 0,
                reserve1: 0,
            },
        );
        debug!("Initialized pool {} for {}/{} at {}", address, token0, token1, sqrt_price_x96);
        Ok(address)
    }

    fn mint(
        &mut self,
        caller: Address,
        token0: &mut dyn FungibleToken,
        token1: &mut dyn FungibleToken,
        params: &MintParams,
    ) -> HostResult<MintReceipt> {
        if self.faults.reject_mint {
            return Err(Rejection::new("position minting disabled"));
        }
        if token0.address() != params.token0 || token1.address() != params.token1 {
            return Err(Rejection::new("token handles do not match the parameters"));
        }

        let tier = FeeTier::try_from(params.fee).map_err(|e| Rejection::new(e.to_string()))?;
        if (params.tick_lower, params.tick_upper) != tier.full_range_ticks() {
            return Err(Rejection::new("only full-range positions are supported"));
        }

        let pool = self
            .pools
            .get(&(params.token0, params.token1, params.fee))
            .ok_or_else(|| Rejection::new("pool not initialized"))?;
        let sqrt_price = pool.sqrt_price_x96;
        let pool_address = pool.address;

        let liquidity = full_range_liquidity(
            sqrt_price,
            params.amount0_desired,
            params.amount1_desired,
        )?;
        if liquidity == 0 {
            return Err(Rejection::new("deposit yields zero liquidity"));
        }
        let (amount0, amount1) = full_range_amounts(sqrt_price, liquidity)?;
        let amount0 = amount0.min(params.amount0_desired);
        let amount1 = amount1.min(params.amount1_desired);
        if amount0 < params.amount0_min || amount1 < params.amount1_min {
            return Err(Rejection::new("price slippage check"));
        }

        token0.transfer_from(self.address, caller, pool_address, amount0)?;
        token1.transfer_from(self.address, caller, pool_address, amount1)?;

        if let Some(pool) = self
            .pools
            .get_mut(&(params.token0, params.token1, params.fee))
        {
            pool.liquidity = pool.liquidity.saturating_add(liquidity);
            pool.reserve0 = pool.reserve0.saturating_add(amount0);
            pool.reserve1 = pool.reserve1.saturating_add(amount1);
        }

        let id = self.positions.len() as u64 + 1;
        self.positions.push(Position {
            id,
            pool: pool_address,
            owner: params.recipient,
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
            liquidity,
            amount0,
            amount1,
        });
        debug!(
            "Minted position {} in {}: liquidity={} amount0={} amount1={}",
            id, pool_address, liquidity, amount0, amount1
        );

        Ok(MintReceipt {
            position_id: id,
            liquidity,
            amount0,
            amount1,
        })
    }
}

fn wide(reason: &str) -> impl Fn(ascent_math::MathError) -> Rejection + '_ {
    move |e| Rejection::new(format!("{}: {}", reason, e))
}

/// Largest liquidity both amounts can back: min(a0·√P, a1/√P)
pub fn full_range_liquidity(sqrt_price_x96: U256, amount0: u128, amount1: u128) -> HostResult<u128> {
    let from0 = mul_div_u256(U256::from(amount0), sqrt_price_x96, Q96, Rounding::Down)
        .map_err(wide("liquidity from amount0"))?;
    let from1 = mul_div_u256(U256::from(amount1), Q96, sqrt_price_x96, Rounding::Down)
        .map_err(wide("liquidity from amount1"))?;
    u256_to_u128(from0.min(from1)).map_err(wide("liquidity"))
}

/// Token amounts a full-range position of `liquidity` holds, rounded up
pub fn full_range_amounts(sqrt_price_x96: U256, liquidity: u128) -> HostResult<(u128, u128)> {
    let liquidity = U256::from(liquidity);
    let amount0 = mul_div_u256(liquidity, Q96, sqrt_price_x96, Rounding::Up)
        .and_then(u256_to_u128)
        .map_err(wide("amount0"))?;
    let amount1 = mul_div_u256(liquidity, sqrt_price_x96, Q96, Rounding::Up)
        .and_then(u256_to_u128)
        .map_err(wide("amount1"))?;
    Ok((amount0, amount1))
}
