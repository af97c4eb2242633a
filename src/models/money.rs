use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a currency value to cents, midpoints away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Price and tax figures accumulated over a set of lines.
///
/// `price` is the listed (pre-discount) total. Each tax field is the sum of
/// `line_total * rate / 100` over the lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTotals {
    pub price: Decimal,
    pub sgst: Decimal,
    pub cgst: Decimal,
    pub tax: Decimal,
}

impl TaxTotals {
    pub fn accumulate(
        &mut self,
        line_total: Decimal,
        sgst_rate: Decimal,
        cgst_rate: Decimal,
        tax_rate: Decimal,
    ) {
        self.price += line_total;
        self.sgst += line_total * sgst_rate / HUNDRED;
        self.cgst += line_total * cgst_rate / HUNDRED;
        self.tax += line_total * tax_rate / HUNDRED;
    }

    /// The same totals rounded to cents, as they are stored.
    pub fn rounded(&self) -> Self {
        Self {
            price: round_money(self.price),
            sgst: round_money(self.sgst),
            cgst: round_money(self.cgst),
            tax: round_money(self.tax),
        }
    }
}
