//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are shown to customers with French (`fr-FR`) conventions: digit
//! groups separated by a narrow no-break space, a comma as decimal separator
//! and the currency symbol after the amount, e.g. `1 299,00 €`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Digit group separator used by `fr-FR` number formatting (U+202F).
const GROUP_SEPARATOR: char = '\u{202F}';

/// Separator between the amount and the currency symbol (U+00A0).
const SYMBOL_SEPARATOR: char = '\u{00A0}';

/// A price with currency information.
///
/// Serialized in the commerce backend's money shape:
/// `{"amount": "1299.00", "currencyCode": "EUR"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit (euros, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a euro price from an amount in cents.
    #[must_use]
    pub fn from_euro_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2), CurrencyCode::EUR)
    }

    /// Format for display the way the storefront shows prices.
    ///
    /// ```
    /// use trottperf_core::Price;
    ///
    /// let price = Price::from_euro_cents(129_900);
    /// assert_eq!(price.display_fr(), "1\u{202F}299,00\u{A0}€");
    /// ```
    #[must_use]
    pub fn display_fr(&self) -> String {
        let mut rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        rounded.set_sign_positive(true);
        rounded.rescale(2);

        let text = rounded.to_string();
        let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let mut out = String::with_capacity(text.len() + 8);
        if negative {
            out.push('-');
        }
        out.push_str(&group_thousands(integer));
        out.push(',');
        out.push_str(fraction);
        out.push(SYMBOL_SEPARATOR);
        out.push_str(self.currency_code.symbol());
        out
    }
}

/// Insert the `fr-FR` group separator every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(digits.len() + len / 3 * GROUP_SEPARATOR.len_utf8());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// ISO 4217 currency codes accepted by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EUR,
    USD,
    GBP,
    CHF,
}

impl CurrencyCode {
    /// Symbol displayed after the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::EUR => "€",
            Self::USD => "$",
            Self::GBP => "£",
            Self::CHF => "CHF",
        }
    }
}
