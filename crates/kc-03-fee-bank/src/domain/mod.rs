//! Domain types for the FeeEscrow

pub mod totals;

pub use totals::FeeTotals;
