//! Bonding curve state machine
//!
//! A curve is `Active` until a buy pushes `net_raised` to the cap; that buy
//! finalizes the curve and migrates its liquidity before returning. Every
//! mutating operation is all-or-nothing: the host is checkpointed and the
//! curve state backed up on entry, and both are restored if any step fails.

use std::cell::{Cell, RefCell};

use ascent_math::MathError;
use ascent_types::{
    scale_to_ledger, Address, CurveConfig, CurveError, CurveEvent, CurvePhase, CurveResult,
    CurveState, TokensPurchased, TokensSold,
};
use tracing::{debug, info, warn};

use crate::host::CurveHost;
use crate::migration::LiquidityMigrator;
use crate::pricing::CurvePricing;
use crate::reentrancy::{ReentrancyStatus, ScopedReentrancyGuard};

/// One curve instance.
///
/// Operations take `&self` so that a collaborator calling back into the
/// curve mid-operation reaches the guard and is rejected.
#[derive(Debug)]
pub struct BondingCurve {
    address: Address,
    config: CurveConfig,
    pricing: CurvePricing,
    state: RefCell<CurveState>,
    status: Cell<ReentrancyStatus>,
    events: RefCell<Vec<CurveEvent>>,
}

impl BondingCurve {
    pub fn new(address: Address, config: CurveConfig) -> CurveResult<Self> {
        config.validate()?;
        if address.is_zero() {
            return Err(CurveError::invalid_config("curve address must be set"));
        }
        let pricing = CurvePricing::from_config(&config)?;

        info!(
            "Curve {} created: p0={} ratio={} cap={}",
            address, config.initial_price, config.ratio, config.cap
        );

        Ok(Self {
            address,
            config,
            pricing,
            state: RefCell::new(CurveState::default()),
            status: Cell::new(ReentrancyStatus::Unlocked),
            events: RefCell::new(Vec::new()),
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn config(&self) -> &CurveConfig {
        &self.config
    }

    pub fn pricing(&self) -> &CurvePricing {
        &self.pricing
    }

    pub fn circulating_supply(&self) -> u128 {
        self.state.borrow().circulating_supply
    }

    pub fn net_raised(&self) -> u128 {
        self.state.borrow().net_raised
    }

    pub fn is_finalized(&self) -> bool {
        self.state.borrow().finalized
    }

    pub fn phase(&self) -> CurvePhase {
        self.state.borrow().phase()
    }

    pub fn state(&self) -> CurveState {
        self.state.borrow().clone()
    }

    pub fn reentrancy_status(&self) -> ReentrancyStatus {
        self.status.get()
    }

    pub fn get_buy_price(&self, supply: u128, amount: u128) -> CurveResult<u128> {
        self.pricing.buy_price(supply, amount)
    }

    pub fn get_sell_price(&self, supply: u128, amount: u128) -> CurveResult<u128> {
        self.pricing.sell_price(supply, amount)
    }

    /// Cost of buying `amount` at the current supply
    pub fn quote_buy(&self, amount: u128) -> CurveResult<u128> {
        self.pricing.buy_price(self.circulating_supply(), amount)
    }

    /// Refund for selling `amount` at the current supply
    pub fn quote_sell(&self, amount: u128) -> CurveResult<u128> {
        self.pricing.sell_price(self.circulating_supply(), amount)
    }

    /// Records emitted by completed operations, oldest first
    pub fn events(&self) -> Vec<CurveEvent> {
        self.events.borrow().clone()
    }

    pub fn take_events(&self) -> Vec<CurveEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Buy `amount` whole units with `paid_value` attached. The excess over
    /// the cost is refunded. Returns the cost charged.
    pub fn buy(
        &self,
        host: &mut dyn CurveHost,
        buyer: Address,
        amount: u128,
        paid_value: u128,
    ) -> CurveResult<u128> {
        self.atomically(host, "buy", |host, guard, events| {
            self.ensure_active()?;
            if amount == 0 {
                return Err(CurveError::InvalidAmount);
            }

            let supply = self.circulating_supply();
            let cost = self.pricing.buy_price(supply, amount)?;
            if paid_value < cost {
                return Err(CurveError::InsufficientPayment {
                    required: cost,
                    provided: paid_value,
                });
            }

            let facets = host.facets();
            facets
                .bank
                .transfer(buyer, self.address, paid_value)
                .map_err(CurveError::TransferFailed)?;
            let scaled = scale_to_ledger(amount, facets.ledger.decimals())
                .ok_or(MathError::ResultOverflow)?;
            facets
                .ledger
                .mint(self.address, buyer, scaled)
                .map_err(CurveError::TransferFailed)?;

            let net_raised = {
                let mut state = self.state.borrow_mut();
                state.net_raised = state
                    .net_raised
                    .checked_add(cost)
                    .ok_or(MathError::ResultOverflow)?;
                state.circulating_supply = supply
                    .checked_add(amount)
                    .ok_or(MathError::ResultOverflow)?;
                state.net_raised
            };

            let excess = paid_value - cost;
            if excess > 0 {
                host.facets()
                    .bank
                    .transfer(self.address, buyer, excess)
                    .map_err(CurveError::RefundTransferFailed)?;
            }

            events.push(
                TokensPurchased {
                    buyer,
                    amount,
                    cost,
                }
                .into(),
            );
            debug!(
                "Buy: buyer={} amount={} cost={} net_raised={}",
                buyer, amount, cost, net_raised
            );

            if net_raised >= self.config.cap {
                guard.enter_migration_phase()?;
                self.finalize(host, events)?;
            }

            Ok(cost)
        })
    }

    /// Sell `amount` whole units back to the curve. The seller must have
    /// approved the curve for the scaled amount on the asset ledger.
    /// Returns the refund paid.
    pub fn sell(&self, host: &mut dyn CurveHost, seller: Address, amount: u128) -> CurveResult<u128> {
        self.atomically(host, "sell", |host, _guard, events| {
            self.ensure_active()?;
            if amount == 0 {
                return Err(CurveError::InvalidAmount);
            }

            let supply = self.circulating_supply();
            if amount > supply {
                return Err(CurveError::InsufficientSupply {
                    requested: amount,
                    available: supply,
                });
            }

            let refund = self.pricing.sell_price(supply, amount)?;
            if refund == 0 {
                return Err(CurveError::ZeroRefund);
            }

            let facets = host.facets();
            let reserve = facets.bank.balance_of(self.address);
            if reserve < refund {
                return Err(CurveError::InsufficientReserve {
                    required: refund,
                    available: reserve,
                });
            }

            let scaled = scale_to_ledger(amount, facets.ledger.decimals())
                .ok_or(MathError::ResultOverflow)?;
            facets
                .ledger
                .transfer_from(self.address, seller, self.address, scaled)
                .map_err(CurveError::TransferFailed)?;
            facets
                .ledger
                .burn(self.address, self.address, scaled)
                .map_err(CurveError::TransferFailed)?;

            self.state.borrow_mut().circulating_supply = supply - amount;

            facets
                .bank
                .transfer(self.address, seller, refund)
                .map_err(CurveError::RefundTransferFailed)?;

            events.push(
                TokensSold {
                    seller,
                    amount,
                    refund,
                }
                .into(),
            );
            debug!("Sell: seller={} amount={} refund={}", seller, amount, refund);

            Ok(refund)
        })
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn ensure_active(&self) -> CurveResult<()> {
        if self.is_finalized() {
            return Err(CurveError::AlreadyFinalized);
        }
        Ok(())
    }

    /// Latch `finalized` and hand the raised value to the venue
    fn finalize(&self, host: &mut dyn CurveHost, events: &mut Vec<CurveEvent>) -> CurveResult<()> {
        let (supply, net_raised) = {
            let mut state = self.state.borrow_mut();
            state.finalized = true;
            (state.circulating_supply, state.net_raised)
        };
        info!(
            "Curve {} reached cap: net_raised={} cap={} supply={}",
            self.address, net_raised, self.config.cap, supply
        );

        let migrator = LiquidityMigrator::new(self.address, &self.config, &self.pricing);
        let record = migrator.migrate(host.facets(), supply, net_raised, events)?;
        self.state.borrow_mut().migration = Some(record);
        Ok(())
    }

    /// Run `operation` under the guard with all-or-nothing semantics.
    /// Events it records are published only if it succeeds.
    fn atomically<T, F>(&self, host: &mut dyn CurveHost, name: &str, operation: F) -> CurveResult<T>
    where
        F: FnOnce(&mut dyn CurveHost, &ScopedReentrancyGuard<'_>, &mut Vec<CurveEvent>) -> CurveResult<T>,
    {
        let guard = ScopedReentrancyGuard::new(&self.status).map_err(|err| {
            warn!("Rejected re-entrant {} on curve {}", name, self.address);
            err
        })?;

        let checkpoint = host.snapshot();
        let backup = self.state.borrow().clone();
        let mut pending = Vec::new();

        match operation(&mut *host, &guard, &mut pending) {
            Ok(value) => {
                host.release(checkpoint);
                self.events.borrow_mut().extend(pending);
                Ok(value)
            }
            Err(err) => {
                host.revert_to(checkpoint);
                *self.state.borrow_mut() = backup;
                warn!("Curve {} {} reverted: {}", self.address, name, err);
                Err(err)
            }
        }
    }
}
