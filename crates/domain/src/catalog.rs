use std::fmt::{Display, Formatter};

use cartrule_core::{AppError, AppResult, ConstraintCode, ConstraintViolation};
use serde::Serialize;

/// Positive catalog product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ProductId(u32);

impl ProductId {
    /// Creates a validated product identifier.
    pub fn new(value: i64) -> AppResult<Self> {
        u32::try_from(value)
            .ok()
            .filter(|value| *value > 0)
            .map(Self)
            .ok_or_else(|| {
                ConstraintViolation::new(ConstraintCode::InvalidProductId, "product_id")
                    .with_value(value)
                    .into()
            })
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Product combination (variant) identifier.
///
/// Zero is the "no combination" sentinel used by admin forms, so a validated
/// `CombinationId` is always positive; see [`CombinationId::from_form`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CombinationId(u32);

impl CombinationId {
    /// Creates an optional combination identifier from a form value.
    ///
    /// Returns `Ok(None)` for the zero sentinel.
    pub fn from_form(value: i64) -> AppResult<Option<Self>> {
        match u32::try_from(value) {
            Ok(0) => Ok(None),
            Ok(value) => Ok(Some(Self(value))),
            Err(_) => Err(AppError::from(
                ConstraintViolation::new(ConstraintCode::InvalidCombinationId, "combination_id")
                    .with_value(value),
            )),
        }
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Product granted for free when a cart rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GiftProduct {
    product_id: ProductId,
    combination_id: Option<CombinationId>,
}

impl GiftProduct {
    /// Creates a gift product reference.
    #[must_use]
    pub fn new(product_id: ProductId, combination_id: Option<CombinationId>) -> Self {
        Self {
            product_id,
            combination_id,
        }
    }

    /// Returns the gifted product.
    #[must_use]
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Returns the gifted combination, if one was chosen.
    #[must_use]
    pub fn combination_id(&self) -> Option<CombinationId> {
        self.combination_id
    }
}
