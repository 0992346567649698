use ascent_math::MathError;
use thiserror::Error;

// ============================================================================
// Collaborator Rejections
// ============================================================================

/// Refusal reported by an external collaborator (bank, ledger, venue)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct Rejection {
    pub reason: String,
}

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Main Error Enum
// ============================================================================

/// Every way a curve operation can fail. Any of these aborts the whole
/// operation and discards its effects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    // ========================================================================
    // Trade Preconditions
    // ========================================================================

    /// Zero or out-of-range trade amount
    #[error("Invalid trade amount")]
    InvalidAmount,

    #[error("Insufficient payment: required {required}, provided {provided}")]
    InsufficientPayment { required: u128, provided: u128 },

    #[error("Insufficient supply: requested {requested}, circulating {available}")]
    InsufficientSupply { requested: u128, available: u128 },

    #[error("Sell would refund zero")]
    ZeroRefund,

    #[error("Insufficient reserve: refund {required}, held {available}")]
    InsufficientReserve { required: u128, available: u128 },

    #[error("Curve already finalized")]
    AlreadyFinalized,

    #[error("Re-entrant call into curve")]
    ReentrancyDetected,

    // ========================================================================
    // Transfer Failures
    // ========================================================================

    #[error("Transfer failed: {0}")]
    TransferFailed(Rejection),

    #[error("Refund transfer failed: {0}")]
    RefundTransferFailed(Rejection),

    #[error("Protocol fee transfer failed: {0}")]
    FeeTransferFailed(Rejection),

    #[error("Dust transfer failed: {0}")]
    DustTransferFailed(Rejection),

    // ========================================================================
    // Migration Failures
    // ========================================================================

    #[error("Pool initialization failed: {0}")]
    PoolInitFailed(String),

    #[error("Position mint failed: {0}")]
    PositionMintFailed(Rejection),

    /// Ledger already holds more than the fixed target supply
    #[error("Ledger supply {minted} exceeds target {target}")]
    SupplyTargetExceeded { minted: u128, target: u128 },

    // ========================================================================
    // Configuration and Arithmetic
    // ========================================================================

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Math(#[from] MathError),
}

impl CurveError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Arithmetic failures are reported under their primitive name
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Self::Math(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CurveError::InsufficientPayment {
            required: 10,
            provided: 9,
        };
        assert_eq!(err.to_string(), "Insufficient payment: required 10, provided 9");

        let err = CurveError::RefundTransferFailed(Rejection::new("receiver reverted"));
        assert_eq!(err.to_string(), "Refund transfer failed: receiver reverted");
    }

    #[test]
    fn test_math_errors_convert() {
        let err: CurveError = MathError::DivisionByZero.into();
        assert_eq!(err, CurveError::Math(MathError::DivisionByZero));
        assert!(err.is_arithmetic());
        assert_eq!(err.to_string(), MathError::DivisionByZero.to_string());
    }
}
