use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Group of related constraints, used by callers to pick a message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintFamily {
    /// Cart rule composition constraints.
    CartRule,
    /// Catalog product references.
    Product,
    /// Product combination references.
    Combination,
    /// Currency references.
    Currency,
    /// Reduction type and magnitude.
    Reduction,
}

/// Violated constraint kinds with stable numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintCode {
    /// Input does not describe any concrete action.
    MissingAction,
    /// Discount application type is unknown or not allowed for the reduction.
    InvalidDiscountApplicationType,
    /// Specific product application without a product.
    MissingDiscountApplicationProduct,
    /// Product identifier is not a positive integer.
    InvalidProductId,
    /// Combination identifier is not a non-negative integer.
    InvalidCombinationId,
    /// Currency identifier is missing or not a positive integer.
    InvalidCurrencyId,
    /// Reduction type is neither amount nor percentage.
    InvalidReductionType,
    /// Percentage reduction is outside `(0, 100]`.
    InvalidReductionPercentage,
    /// Amount reduction is not positive.
    InvalidReductionAmount,
}

impl ConstraintCode {
    /// Returns the stable numeric code exposed to API consumers.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::MissingAction => 101,
            Self::InvalidDiscountApplicationType => 102,
            Self::MissingDiscountApplicationProduct => 103,
            Self::InvalidProductId => 201,
            Self::InvalidCombinationId => 301,
            Self::InvalidCurrencyId => 401,
            Self::InvalidReductionType => 501,
            Self::InvalidReductionPercentage => 502,
            Self::InvalidReductionAmount => 503,
        }
    }

    /// Returns the family this constraint belongs to.
    #[must_use]
    pub fn family(&self) -> ConstraintFamily {
        match self {
            Self::MissingAction
            | Self::InvalidDiscountApplicationType
            | Self::MissingDiscountApplicationProduct => ConstraintFamily::CartRule,
            Self::InvalidProductId => ConstraintFamily::Product,
            Self::InvalidCombinationId => ConstraintFamily::Combination,
            Self::InvalidCurrencyId => ConstraintFamily::Currency,
            Self::InvalidReductionType
            | Self::InvalidReductionPercentage
            | Self::InvalidReductionAmount => ConstraintFamily::Reduction,
        }
    }

    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingAction => "missing_action",
            Self::InvalidDiscountApplicationType => "invalid_discount_application_type",
            Self::MissingDiscountApplicationProduct => "missing_discount_application_product",
            Self::InvalidProductId => "invalid_product_id",
            Self::InvalidCombinationId => "invalid_combination_id",
            Self::InvalidCurrencyId => "invalid_currency_id",
            Self::InvalidReductionType => "invalid_reduction_type",
            Self::InvalidReductionPercentage => "invalid_reduction_percentage",
            Self::InvalidReductionAmount => "invalid_reduction_amount",
        }
    }
}

impl Display for ConstraintCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} ({})", self.as_str(), self.code())
    }
}

/// One violated constraint with the field and value that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code} on field '{field}'{}", offending_value_suffix(.value))]
pub struct ConstraintViolation {
    code: ConstraintCode,
    field: String,
    value: Option<String>,
}

impl ConstraintViolation {
    /// Creates a violation for a field without a recorded value.
    #[must_use]
    pub fn new(code: ConstraintCode, field: impl Into<String>) -> Self {
        Self {
            code,
            field: field.into(),
            value: None,
        }
    }

    /// Re-targets the violation to another form field path.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Attaches the offending input value.
    #[must_use]
    pub fn with_value(mut self, value: impl Display) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// Returns the violated constraint.
    #[must_use]
    pub fn code(&self) -> ConstraintCode {
        self.code
    }

    /// Returns the form field path, for example `gift_product[0].product_id`.
    #[must_use]
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Returns the offending value, if one was recorded.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

fn offending_value_suffix(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(|value| format!(": '{value}'"))
        .unwrap_or_default()
}
