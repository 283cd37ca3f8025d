//! # Mathematical Functions
//!
//! Integer fixed-point math for share pricing and fee assessment.

pub mod big_int;
pub mod safe_math;
pub mod share_math;

// Re-export commonly used functions
pub use big_int::*;
pub use safe_math::*;
pub use share_math::*;
