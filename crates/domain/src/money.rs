use cartrule_core::{AppResult, ConstraintCode, ConstraintViolation};
use rust_decimal::Decimal;
use serde::Serialize;

/// Positive currency identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CurrencyId(u32);

impl CurrencyId {
    /// Creates a validated currency identifier.
    pub fn new(value: i64) -> AppResult<Self> {
        match u32::try_from(value) {
            Ok(value) if value > 0 => Ok(Self(value)),
            _ => Err(
                ConstraintViolation::new(ConstraintCode::InvalidCurrencyId, "currency")
                    .with_value(value)
                    .into(),
            ),
        }
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Decimal amount in one currency, with or without tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Money {
    amount: Decimal,
    currency_id: CurrencyId,
    tax_included: bool,
}

impl Money {
    /// Creates a money value; the amount is stored normalized.
    #[must_use]
    pub fn new(amount: Decimal, currency_id: CurrencyId, tax_included: bool) -> Self {
        Self {
            amount: amount.normalize(),
            currency_id,
            tax_included,
        }
    }

    /// Returns the amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency.
    #[must_use]
    pub fn currency_id(&self) -> CurrencyId {
        self.currency_id
    }

    /// Returns whether the amount includes taxes.
    #[must_use]
    pub fn tax_included(&self) -> bool {
        self.tax_included
    }
}
