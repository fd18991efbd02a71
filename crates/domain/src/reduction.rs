use std::str::FromStr;

use cartrule_core::{AppError, AppResult, ConstraintCode, ConstraintViolation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Supported reduction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionType {
    /// Fixed amount in a currency.
    Amount,
    /// Percentage of the discounted scope.
    Percentage,
}

impl ReductionType {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Percentage => "percentage",
        }
    }

    /// Constraint raised when a value of this kind is out of range.
    #[must_use]
    pub fn invalid_value_code(&self) -> ConstraintCode {
        match self {
            Self::Amount => ConstraintCode::InvalidReductionAmount,
            Self::Percentage => ConstraintCode::InvalidReductionPercentage,
        }
    }
}

impl FromStr for ReductionType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "amount" => Ok(Self::Amount),
            "percentage" => Ok(Self::Percentage),
            _ => Err(
                ConstraintViolation::new(ConstraintCode::InvalidReductionType, "type")
                    .with_value(value)
                    .into(),
            ),
        }
    }
}

/// Validated reduction kind and magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Reduction {
    reduction_type: ReductionType,
    value: Decimal,
}

impl Reduction {
    /// Upper bound for percentage reductions.
    pub const MAX_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

    /// Creates a validated reduction.
    ///
    /// Amounts must be positive; percentages must lie in `(0, 100]`.
    pub fn new(reduction_type: ReductionType, value: Decimal) -> AppResult<Self> {
        let in_range = match reduction_type {
            ReductionType::Amount => value > Decimal::ZERO,
            ReductionType::Percentage => value > Decimal::ZERO && value <= Self::MAX_PERCENTAGE,
        };

        if !in_range {
            return Err(
                ConstraintViolation::new(reduction_type.invalid_value_code(), "value")
                    .with_value(value)
                    .into(),
            );
        }

        Ok(Self {
            reduction_type,
            value: value.normalize(),
        })
    }

    /// Returns reduction kind.
    #[must_use]
    pub fn reduction_type(&self) -> ReductionType {
        self.reduction_type
    }

    /// Returns normalized magnitude.
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.value
    }
}
