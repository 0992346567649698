/// Shared types for the Ascent bonding curve
///
/// This crate provides the configuration, state, event and error types used
/// by the curve core, its in-memory hosts and the simulation tooling.

pub mod address;
pub mod amount_serde;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod state;

// Re-export all public types
pub use address::*;
pub use config::*;
pub use constants::*;
pub use errors::*;
pub use events::*;
pub use state::*;

/// Result type alias using the shared error type
pub type CurveResult<T> = std::result::Result<T, CurveError>;
