//! Collaborator interfaces the curve drives
//!
//! Every call names the acting account explicitly (`caller`, `spender`,
//! `owner`). Collaborators report refusals as a `Rejection`; the curve maps
//! each one onto the `CurveError` variant for the step that failed.

use ascent_math::U256;
use ascent_types::{Address, Rejection};

pub type HostResult<T> = Result<T, Rejection>;

/// Handle for a host checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotId(pub u64);

// ============================================================================
// Value Holders
// ============================================================================

/// Native-asset balances
pub trait NativeBank {
    fn balance_of(&self, owner: Address) -> u128;

    /// Move native value. The receiver may refuse it.
    fn transfer(&mut self, from: Address, to: Address, amount: u128) -> HostResult<()>;
}

/// Allowance-based fungible token
pub trait FungibleToken {
    fn address(&self) -> Address;

    fn balance_of(&self, owner: Address) -> u128;

    fn total_supply(&self) -> u128;

    fn approve(&mut self, owner: Address, spender: Address, amount: u128) -> HostResult<()>;

    /// Move `amount` out of `from` on the strength of `spender`'s allowance.
    /// A holder moving its own balance needs no allowance.
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> HostResult<()>;
}

/// The asset sold by the curve. Only the curve may mint or burn.
pub trait AssetLedger: FungibleToken {
    fn decimals(&self) -> u8;

    fn mint(&mut self, caller: Address, to: Address, amount: u128) -> HostResult<()>;

    fn burn(&mut self, caller: Address, from: Address, amount: u128) -> HostResult<()>;

    fn as_fungible(&mut self) -> &mut dyn FungibleToken;
}

/// Token representation of the native asset
pub trait WrappedNative: FungibleToken {
    /// Lock `value` of `owner`'s native balance and credit the same amount of tokens
    fn deposit(&mut self, bank: &mut dyn NativeBank, owner: Address, value: u128) -> HostResult<()>;

    /// Burn `amount` of `owner`'s tokens and return the native value
    fn withdraw(&mut self, bank: &mut dyn NativeBank, owner: Address, amount: u128) -> HostResult<()>;

    fn as_fungible(&mut self) -> &mut dyn FungibleToken;
}

// ============================================================================
// Liquidity Venue
// ============================================================================

/// Arguments for a liquidity position deposit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintParams {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_desired: u128,
    pub amount1_desired: u128,
    pub amount0_min: u128,
    pub amount1_min: u128,
    pub recipient: Address,
}

/// Result of a position deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintReceipt {
    pub position_id: u64,
    pub liquidity: u128,
    pub amount0: u128,
    pub amount1: u128,
}

/// Concentrated-liquidity position manager
pub trait PositionManager {
    fn address(&self) -> Address;

    /// Returns the pool handle. A zero address means no usable pool.
    fn create_and_initialize_pool_if_necessary(
        &mut self,
        token0: Address,
        token1: Address,
        fee: u32,
        sqrt_price_x96: U256,
    ) -> HostResult<Address>;

    /// Deposit liquidity, pulling both tokens from `caller` with the
    /// manager's own allowance
    fn mint(
        &mut self,
        caller: Address,
        token0: &mut dyn FungibleToken,
        token1: &mut dyn FungibleToken,
        params: &MintParams,
    ) -> HostResult<MintReceipt>;
}

// ============================================================================
// Host
// ============================================================================

/// Disjoint mutable views of every collaborator
pub struct HostFacets<'a> {
    pub bank: &'a mut dyn NativeBank,
    pub ledger: &'a mut dyn AssetLedger,
    pub wrapped: &'a mut dyn WrappedNative,
    pub venue: &'a mut dyn PositionManager,
}

/// Environment a curve operation runs against.
///
/// `snapshot` opens a checkpoint; `revert_to` restores everything changed
/// since it and `release` keeps the changes. Each checkpoint is closed by
/// exactly one of the two.
pub trait CurveHost {
    fn snapshot(&mut self) -> SnapshotId;

    fn revert_to(&mut self, id: SnapshotId);

    fn release(&mut self, id: SnapshotId);

    fn facets(&mut self) -> HostFacets<'_>;
}
