pub mod amortization;
pub mod error;
pub mod format;
pub mod report;
pub mod types;

pub use error::EmiError;
pub use types::*;

/// Standard result type for all EMI operations
pub type EmiResult<T> = Result<T, EmiError>;
