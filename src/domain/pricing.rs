//! Installment Pricing Calculator
//!
//! Turns a flat list of bank commission rates plus a product price into a
//! display-ready table of payment plans: one group per bank, one row per
//! installment option. Pure and synchronous; callers fetch the rates and
//! render the result however they like.
//!
//! No rounding happens here. Locale formatting and two-decimal display are
//! the consumer's concern.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::commission::CommissionRate;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// One payment plan row for a single installment option.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstallmentQuote {
    pub installment_count: i32,
    /// Commission actually applied. Always zero for single payment,
    /// whatever the configured rate says.
    pub effective_commission_rate: Decimal,
    pub monthly_amount: Decimal,
    pub total_amount: Decimal,
}

/// All installment options offered by one bank, ascending by count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankQuotes {
    pub bank_name: String,
    pub quotes: Vec<InstallmentQuote>,
}

/// Quote table for a product: banks in the order they first appear in the
/// rate list, never alphabetized, so admin-curated ordering survives.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteBook {
    pub banks: Vec<BankQuotes>,
}

impl QuoteBook {
    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    pub fn bank(&self, name: &str) -> Option<&BankQuotes> {
        self.banks.iter().find(|b| b.bank_name == name)
    }
}

/// Computes per-bank payment schedules for `price` from the given rates.
///
/// A missing price yields an empty book; a rate whose minimum-amount
/// threshold exceeds the price is skipped. Nothing here ever fails:
/// malformed configuration degrades to fewer quotes, not errors.
pub fn compute_quotes(price: Option<Decimal>, rates: &[CommissionRate]) -> QuoteBook {
    let price = match price {
        Some(p) if !p.is_sign_negative() => p,
        _ => return QuoteBook::default(),
    };

    let mut book = QuoteBook::default();
    for rate in rates {
        if let Some(min) = rate.minimum() {
            if price < min {
                continue;
            }
        }
        let idx = book
            .banks
            .iter()
            .position(|b| b.bank_name == rate.bank_name)
            .unwrap_or_else(|| {
                book.banks.push(BankQuotes {
                    bank_name: rate.bank_name.clone(),
                    quotes: Vec::new(),
                });
                book.banks.len() - 1
            });
        book.banks[idx].quotes.push(quote_for(price, rate));
    }
    for group in &mut book.banks {
        group.quotes.sort_by_key(|q| q.installment_count);
    }
    book
}

fn quote_for(price: Decimal, rate: &CommissionRate) -> InstallmentQuote {
    // Single payment is never charged a fee, even when a rate is configured.
    let effective = if rate.installment_count == 1 {
        Decimal::ZERO
    } else {
        rate.rate()
    };
    let total = price * (HUNDRED + effective) / HUNDRED;
    InstallmentQuote {
        installment_count: rate.installment_count,
        effective_commission_rate: effective,
        monthly_amount: total / Decimal::from(rate.installment_count),
        total_amount: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(bank: &str, count: i32, commission: &str, min: &str) -> CommissionRate {
        CommissionRate::new(bank, "all", count, commission, min).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn single_payment_is_always_commission_free() {
        let rates = [rate("Garanti", 1, "4.50", "0")];
        let book = compute_quotes(Some(dec("500")), &rates);
        let quote = &book.bank("Garanti").unwrap().quotes[0];
        assert_eq!(quote.effective_commission_rate, Decimal::ZERO);
        assert_eq!(quote.total_amount, dec("500"));
        assert_eq!(quote.monthly_amount, dec("500"));
    }

    #[test]
    fn minimum_amount_gates_eligibility() {
        let blocked = [rate("Akbank", 6, "2.00", "150")];
        assert!(compute_quotes(Some(dec("100")), &blocked).is_empty());

        let allowed = [rate("Akbank", 6, "2.00", "50")];
        assert_eq!(compute_quotes(Some(dec("100")), &allowed).banks.len(), 1);

        // Exact threshold is still eligible.
        let boundary = [rate("Akbank", 6, "2.00", "100")];
        assert_eq!(compute_quotes(Some(dec("100")), &boundary).banks.len(), 1);
    }

    #[test]
    fn malformed_minimum_never_excludes() {
        let rates = [rate("Akbank", 6, "2.00", "not-a-number")];
        assert_eq!(compute_quotes(Some(dec("1")), &rates).banks.len(), 1);
    }

    #[test]
    fn monthly_amount_shrinks_as_installments_grow() {
        let rates = [
            rate("İşbank", 3, "2.00", "0"),
            rate("İşbank", 6, "2.00", "0"),
            rate("İşbank", 9, "2.00", "0"),
        ];
        let book = compute_quotes(Some(dec("900")), &rates);
        let quotes = &book.bank("İşbank").unwrap().quotes;
        assert!(quotes[0].monthly_amount > quotes[1].monthly_amount);
        assert!(quotes[1].monthly_amount > quotes[2].monthly_amount);
    }

    #[test]
    fn groups_by_bank_in_first_occurrence_order() {
        let rates = [
            rate("A", 1, "0", "0"),
            rate("B", 1, "0", "0"),
            rate("A", 3, "1.00", "0"),
        ];
        let book = compute_quotes(Some(dec("100")), &rates);
        assert_eq!(book.banks.len(), 2);
        assert_eq!(book.banks[0].bank_name, "A");
        assert_eq!(book.banks[1].bank_name, "B");
        let counts: Vec<i32> = book.banks[0].quotes.iter().map(|q| q.installment_count).collect();
        assert_eq!(counts, vec![1, 3]);
        assert_eq!(book.banks[1].quotes.len(), 1);
    }

    #[test]
    fn unordered_input_is_sorted_within_a_bank() {
        let rates = [
            rate("QNB", 9, "3.00", "0"),
            rate("QNB", 1, "0", "0"),
            rate("QNB", 6, "2.00", "0"),
        ];
        let book = compute_quotes(Some(dec("100")), &rates);
        let counts: Vec<i32> = book.banks[0].quotes.iter().map(|q| q.installment_count).collect();
        assert_eq!(counts, vec![1, 6, 9]);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let rates = [
            rate("A", 3, "2.50", "0"),
            rate("B", 6, "3.75", "100"),
        ];
        let price = Some(dec("250"));
        assert_eq!(compute_quotes(price, &rates), compute_quotes(price, &rates));
    }

    #[test]
    fn concrete_three_installment_scenario() {
        let rates = [rate("X", 3, "3.00", "0")];
        let book = compute_quotes(Some(dec("1000")), &rates);
        let quote = &book.bank("X").unwrap().quotes[0];
        assert_eq!(quote.effective_commission_rate, dec("3.00"));
        assert_eq!(quote.total_amount, dec("1030"));
        assert_eq!(quote.monthly_amount.round_dp(2), dec("343.33"));
    }

    #[test]
    fn empty_and_missing_inputs_yield_empty_book() {
        assert!(compute_quotes(Some(dec("100")), &[]).is_empty());
        assert!(compute_quotes(None, &[rate("A", 3, "2.00", "0")]).is_empty());
        assert!(compute_quotes(Some(dec("-1")), &[rate("A", 3, "2.00", "0")]).is_empty());
    }

    #[test]
    fn card_type_does_not_filter_quotes() {
        let rates = [
            CommissionRate::new("Ziraat", "visa", 3, "2.00", "0").unwrap(),
            CommissionRate::new("Ziraat", "mastercard", 6, "2.50", "0").unwrap(),
        ];
        let book = compute_quotes(Some(dec("100")), &rates);
        assert_eq!(book.bank("Ziraat").unwrap().quotes.len(), 2);
    }
}
