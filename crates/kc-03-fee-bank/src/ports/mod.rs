//! Ports for the FeeEscrow

pub mod inbound;
pub mod outbound;

pub use inbound::FeeSpender;
pub use outbound::{LedgerError, TokenLedger};
