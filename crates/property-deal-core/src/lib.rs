pub mod error;
pub mod types;

pub mod deal;
pub mod financing;
pub mod proforma;
pub mod purchase;
pub mod returns;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::PropertyDealError;
pub use types::*;

/// Standard result type for all property-deal operations
pub type PropertyDealResult<T> = Result<T, PropertyDealError>;
