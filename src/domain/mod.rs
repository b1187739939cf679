//! Domain model: commission-rate configuration and the pricing calculator.

pub mod commission;
pub mod pricing;

pub use commission::CommissionRate;
pub use pricing::{compute_quotes, BankQuotes, InstallmentQuote, QuoteBook};
