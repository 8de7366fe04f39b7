pub mod cashflow;
pub mod error;
pub mod scenario;
pub mod types;

#[cfg(feature = "profit_timer")]
pub mod profit_timer;

#[cfg(feature = "budgets")]
pub mod budgets;

pub use error::RentFlowError;
pub use types::*;

/// Standard result type for fallible rentflow operations
pub type RentFlowResult<T> = Result<T, RentFlowError>;
