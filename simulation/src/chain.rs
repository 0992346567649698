//! In-memory host for bonding curves
//!
//! Holds the native bank, the asset ledger, the wrapped native token and the
//! venue, and checkpoints them by cloning. Clones are cheap at simulation
//! sizes.

use ascent_core::{
    BondingCurve, CurveHost, FungibleToken, HostFacets, HostResult, NativeBank, SnapshotId,
};
use ascent_types::{Address, CurveConfig, CurveResult, DEFAULT_LEDGER_DECIMALS};
use tracing::{info, warn};

use crate::bank::{NativeBalances, ReceiveHook};
use crate::token::{Erc20Ledger, WrappedNativeToken};
use crate::venue::InMemoryVenue;

/// Addresses of the chain's fixed contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLayout {
    pub asset: Address,
    pub wrapped: Address,
    pub venue: Address,
}

impl Default for ChainLayout {
    fn default() -> Self {
        Self {
            asset: Address::from_low_u64(0xa55e_7000),
            wrapped: Address::from_low_u64(0xe7e7_0000),
            venue: Address::from_low_u64(0x5e_0000),
        }
    }
}

#[derive(Debug, Clone)]
struct World {
    bank: NativeBalances,
    ledger: Erc20Ledger,
    wrapped: WrappedNativeToken,
    venue: InMemoryVenue,
}

#[derive(Debug)]
pub struct InMemoryChain {
    world: World,
    checkpoints: Vec<World>,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::with_layout(ChainLayout::default(), DEFAULT_LEDGER_DECIMALS)
    }

    pub fn with_layout(layout: ChainLayout, decimals: u8) -> Self {
        Self {
            world: World {
                bank: NativeBalances::new(),
                ledger: Erc20Ledger::new(layout.asset, decimals),
                wrapped: WrappedNativeToken::new(layout.wrapped),
                venue: InMemoryVenue::new(layout.venue),
            },
            checkpoints: Vec::new(),
        }
    }

    /// Deploy a curve and make it the asset's minter
    pub fn launch_curve(&mut self, address: Address, config: CurveConfig) -> CurveResult<BondingCurve> {
        let curve = BondingCurve::new(address, config)?;
        self.world.ledger.set_minter(address);
        info!("Launched curve {} over asset {}", address, self.world.ledger.address());
        Ok(curve)
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    pub fn fund(&mut self, owner: Address, amount: u128) {
        self.world.bank.credit(owner, amount);
    }

    pub fn native_balance(&self, owner: Address) -> u128 {
        self.world.bank.balance_of(owner)
    }

    pub fn asset_balance(&self, owner: Address) -> u128 {
        self.world.ledger.balance_of(owner)
    }

    pub fn set_receive_hook(&mut self, owner: Address, hook: ReceiveHook) {
        self.world.bank.set_receive_hook(owner, hook);
    }

    pub fn clear_receive_hook(&mut self, owner: Address) {
        self.world.bank.clear_receive_hook(owner);
    }

    /// Let `spender` pull `amount` of the asset from `owner`
    pub fn approve_asset(&mut self, owner: Address, spender: Address, amount: u128) -> HostResult<()> {
        self.world.ledger.approve(owner, spender, amount)
    }

    // ========================================================================
    // Contracts
    // ========================================================================

    pub fn bank(&self) -> &NativeBalances {
        &self.world.bank
    }

    pub fn ledger(&self) -> &Erc20Ledger {
        &self.world.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Erc20Ledger {
        &mut self.world.ledger
    }

    pub fn wrapped(&self) -> &WrappedNativeToken {
        &self.world.wrapped
    }

    pub fn venue(&self) -> &InMemoryVenue {
        &self.world.venue
    }

    pub fn venue_mut(&mut self) -> &mut InMemoryVenue {
        &mut self.world.venue
    }

    /// Open checkpoints
    pub fn checkpoint_depth(&self) -> usize {
        self.checkpoints.len()
    }
}

impl Default for InMemoryChain {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveHost for InMemoryChain {
    fn snapshot(&mut self) -> SnapshotId {
        self.checkpoints.push(self.world.clone());
        SnapshotId(self.checkpoints.len() as u64 - 1)
    }

    fn revert_to(&mut self, id: SnapshotId) {
        let index = id.0 as usize;
        if index >= self.checkpoints.len() {
            warn!("Revert to unknown checkpoint {}", id.0);
            return;
        }
        let mut closed = self.checkpoints.split_off(index);
        self.world = closed.swap_remove(0);
    }

    fn release(&mut self, id: SnapshotId) {
        let index = id.0 as usize;
        if index >= self.checkpoints.len() {
            warn!("Release of unknown checkpoint {}", id.0);
            return;
        }
        self.checkpoints.truncate(index);
    }

    fn facets(&mut self) -> HostFacets<'_> {
        HostFacets {
            bank: &mut self.world.bank,
            ledger: &mut self.world.ledger,
            wrapped: &mut self.world.wrapped,
            venue: &mut self.world.venue,
        }
    }
}
