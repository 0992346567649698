/// Single-flight protection for curve operations.
/// Every mutating operation holds the lock for its whole duration, including
/// the calls it makes into the bank, the ledger and the venue, so a
/// collaborator that calls back into the curve is turned away.

use std::cell::Cell;

use ascent_types::{CurveError, CurveResult};
use tracing::warn;

// ============================================================================
// Reentrancy Status Types
// ============================================================================

/// Reentrancy guard status flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReentrancyStatus {
    /// Curve is ready for an operation
    #[default]
    Unlocked,
    /// A buy or sell is in progress
    Locked,
    /// The buy that crossed the cap is migrating liquidity
    Migrating,
}

// ============================================================================
// Reentrancy Guard Manager
// ============================================================================

/// Reentrancy guard manager
pub struct ReentrancyGuard;

impl ReentrancyGuard {
    /// Acquire lock for a curve operation
    pub fn acquire(status: &Cell<ReentrancyStatus>) -> CurveResult<()> {
        match status.get() {
            ReentrancyStatus::Unlocked => {
                status.set(ReentrancyStatus::Locked);
                Ok(())
            }
            _ => Err(CurveError::ReentrancyDetected),
        }
    }

    /// Move a held lock into the migration phase
    pub fn acquire_for_migration(status: &Cell<ReentrancyStatus>) -> CurveResult<()> {
        match status.get() {
            ReentrancyStatus::Locked => {
                status.set(ReentrancyStatus::Migrating);
                Ok(())
            }
            _ => Err(CurveError::ReentrancyDetected),
        }
    }

    /// Release lock after operation completes
    pub fn release(status: &Cell<ReentrancyStatus>) {
        if status.get() == ReentrancyStatus::Unlocked {
            warn!("Releasing an already unlocked curve");
        }
        status.set(ReentrancyStatus::Unlocked);
    }
}

/// RAII-style guard that automatically releases on drop
pub struct ScopedReentrancyGuard<'a> {
    status: &'a Cell<ReentrancyStatus>,
}

impl<'a> ScopedReentrancyGuard<'a> {
    /// Create a new scoped guard that acquires the lock
    pub fn new(status: &'a Cell<ReentrancyStatus>) -> CurveResult<Self> {
        ReentrancyGuard::acquire(status)?;
        Ok(Self { status })
    }

    pub fn enter_migration_phase(&self) -> CurveResult<()> {
        ReentrancyGuard::acquire_for_migration(self.status)
    }
}

impl<'a> Drop for ScopedReentrancyGuard<'a> {
    fn drop(&mut self) {
        ReentrancyGuard::release(self.status);
    }
}
