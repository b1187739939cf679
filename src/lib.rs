//! Installment Pricing Service
//!
//! Back-office piece of a home-appliance storefront: administrators
//! configure per-bank virtual-POS commission rates, and the storefront asks
//! for per-bank payment schedules (monthly amount, total, effective
//! commission) for a product price.
//!
//! ## Features
//! - Commission-rate configuration per bank, card type, and installment count
//! - Minimum-amount eligibility thresholds
//! - Pure quote calculator, grouped per bank and sorted by installment count
//! - Single-payment transactions are always commission-free

use thiserror::Error;

pub mod domain;

pub use domain::{compute_quotes, BankQuotes, CommissionRate, InstallmentQuote, QuoteBook};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Commission rate not found")]
    RateNotFound,

    #[error("Bank name must not be empty")]
    MissingBankName,

    #[error("Installment count must be at least 1, got {0}")]
    InvalidInstallmentCount(i32),

    #[error("Storage error: {0}")]
    StorageError(String),
}

pub type Result<T> = std::result::Result<T, PricingError>;
