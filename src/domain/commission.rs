//! Commission Rate Records
//!
//! Rows configured by an administrator per issuing bank: how many monthly
//! payments a card supports and what percentage the bank charges for it.
//! The rate and minimum-amount columns are stored as text, exactly as the
//! virtual-POS panels export them, so parsing is deliberately lenient.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PricingError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommissionRate {
    pub id: Uuid,
    pub bank_name: String,
    /// Card network tag ("all" or a specific brand). Informational only:
    /// quotes are never filtered by card type.
    pub card_type: String,
    /// Number of equal monthly payments; 1 is a single immediate payment.
    pub installment_count: i32,
    /// Percentage fee as text, e.g. "2.50" for 2.5%.
    pub commission_rate: String,
    /// Minimum eligible purchase amount as text. "0", empty, or garbage
    /// all mean the rate has no minimum.
    pub min_amount: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommissionRate {
    pub fn new(
        bank_name: impl Into<String>,
        card_type: impl Into<String>,
        installment_count: i32,
        commission_rate: impl Into<String>,
        min_amount: impl Into<String>,
    ) -> Result<Self> {
        let bank_name = bank_name.into();
        if bank_name.trim().is_empty() {
            return Err(PricingError::MissingBankName);
        }
        if installment_count < 1 {
            return Err(PricingError::InvalidInstallmentCount(installment_count));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::now_v7(),
            bank_name,
            card_type: card_type.into(),
            installment_count,
            commission_rate: commission_rate.into(),
            min_amount: min_amount.into(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Parsed commission percentage. Garbled text degrades to zero rather
    /// than failing the whole quote table.
    pub fn rate(&self) -> Decimal {
        parse_lenient(&self.commission_rate).unwrap_or(Decimal::ZERO)
    }

    /// Parsed minimum eligible amount. Zero, negative, empty, and
    /// unparsable values all collapse to `None` (no minimum), so a
    /// malformed threshold can never exclude a rate.
    pub fn minimum(&self) -> Option<Decimal> {
        parse_lenient(&self.min_amount).filter(|m| m > &Decimal::ZERO)
    }
}

fn parse_lenient(text: &str) -> Option<Decimal> {
    text.trim().replace(',', ".").parse().ok()
}
