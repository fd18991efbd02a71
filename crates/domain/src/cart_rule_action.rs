//! What a cart rule does once its conditions are met.
//!
//! An action combines a free-shipping flag, an optional gift product and an
//! optional discount. At least one of them must be effective.

use cartrule_core::{AppError, AppResult, ConstraintCode, ConstraintViolation};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{DiscountApplicationType, GiftProduct, Money, Reduction, ReductionType};

/// Fixed-amount discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AmountDiscount {
    money: Money,
    application_type: DiscountApplicationType,
}

impl AmountDiscount {
    /// Creates a validated amount discount.
    ///
    /// Only whole-order and specific-product scopes accept fixed amounts.
    pub fn new(money: Money, application_type: DiscountApplicationType) -> AppResult<Self> {
        Reduction::new(ReductionType::Amount, money.amount())?;

        if !application_type.allows_amount_discount() {
            return Err(ConstraintViolation::new(
                ConstraintCode::InvalidDiscountApplicationType,
                "discount_application",
            )
            .with_value(application_type.kind().as_str())
            .into());
        }

        Ok(Self {
            money,
            application_type,
        })
    }

    /// Returns discounted money.
    #[must_use]
    pub fn money(&self) -> Money {
        self.money
    }

    /// Returns discount scope.
    #[must_use]
    pub fn application_type(&self) -> DiscountApplicationType {
        self.application_type
    }
}

/// Percentage discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PercentageDiscount {
    percentage: Decimal,
    apply_to_discounted_products: bool,
    application_type: DiscountApplicationType,
}

impl PercentageDiscount {
    /// Creates a validated percentage discount.
    pub fn new(
        percentage: Decimal,
        apply_to_discounted_products: bool,
        application_type: DiscountApplicationType,
    ) -> AppResult<Self> {
        let reduction = Reduction::new(ReductionType::Percentage, percentage)?;

        Ok(Self {
            percentage: reduction.value(),
            apply_to_discounted_products,
            application_type,
        })
    }

    /// Returns the percentage in `(0, 100]`.
    #[must_use]
    pub fn percentage(&self) -> Decimal {
        self.percentage
    }

    /// Returns whether already discounted products are reduced too.
    #[must_use]
    pub fn apply_to_discounted_products(&self) -> bool {
        self.apply_to_discounted_products
    }

    /// Returns discount scope.
    #[must_use]
    pub fn application_type(&self) -> DiscountApplicationType {
        self.application_type
    }
}

/// Discount part of a cart rule action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "reduction_type", rename_all = "snake_case")]
pub enum DiscountAction {
    /// Fixed amount off.
    Amount(AmountDiscount),
    /// Percentage off.
    Percentage(PercentageDiscount),
}

impl DiscountAction {
    /// Returns the reduction kind.
    #[must_use]
    pub fn reduction_type(&self) -> ReductionType {
        match self {
            Self::Amount(_) => ReductionType::Amount,
            Self::Percentage(_) => ReductionType::Percentage,
        }
    }

    /// Returns discount scope.
    #[must_use]
    pub fn application_type(&self) -> DiscountApplicationType {
        match self {
            Self::Amount(discount) => discount.application_type(),
            Self::Percentage(discount) => discount.application_type(),
        }
    }
}

impl From<AmountDiscount> for DiscountAction {
    fn from(value: AmountDiscount) -> Self {
        Self::Amount(value)
    }
}

impl From<PercentageDiscount> for DiscountAction {
    fn from(value: PercentageDiscount) -> Self {
        Self::Percentage(value)
    }
}

/// Immutable cart rule action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CartRuleAction {
    free_shipping: bool,
    gift_product: Option<GiftProduct>,
    discount: Option<DiscountAction>,
}

impl CartRuleAction {
    /// Creates a validated action.
    ///
    /// Fails with `MissingAction` when shipping is not free and neither a
    /// gift nor a discount is given.
    pub fn new(
        free_shipping: bool,
        gift_product: Option<GiftProduct>,
        discount: Option<DiscountAction>,
    ) -> AppResult<Self> {
        if !free_shipping && gift_product.is_none() && discount.is_none() {
            return Err(AppError::constraint(ConstraintCode::MissingAction, "action"));
        }

        Ok(Self {
            free_shipping,
            gift_product,
            discount,
        })
    }

    /// Returns whether shipping is free.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.free_shipping
    }

    /// Returns the gift product, if any.
    #[must_use]
    pub fn gift_product(&self) -> Option<&GiftProduct> {
        self.gift_product.as_ref()
    }

    /// Returns the discount, if any.
    #[must_use]
    pub fn discount(&self) -> Option<&DiscountAction> {
        self.discount.as_ref()
    }
}
