use std::str::FromStr;

use cartrule_core::{AppError, AppResult, ConstraintCode, ConstraintViolation};
use serde::{Deserialize, Serialize};

use crate::ProductId;

/// Discount application tags as submitted by admin forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountApplicationKind {
    /// Whole order, shipping excluded.
    OrderWithoutShipping,
    /// One chosen product.
    SpecificProduct,
    /// Cheapest product in the cart.
    CheapestProduct,
    /// Products matching the rule's product restrictions.
    SelectedProducts,
}

impl DiscountApplicationKind {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderWithoutShipping => "order_without_shipping",
            Self::SpecificProduct => "specific_product",
            Self::CheapestProduct => "cheapest_product",
            Self::SelectedProducts => "selected_products",
        }
    }
}

impl FromStr for DiscountApplicationKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "order_without_shipping" => Ok(Self::OrderWithoutShipping),
            "specific_product" => Ok(Self::SpecificProduct),
            "cheapest_product" => Ok(Self::CheapestProduct),
            "selected_products" => Ok(Self::SelectedProducts),
            _ => Err(ConstraintViolation::new(
                ConstraintCode::InvalidDiscountApplicationType,
                "discount_application",
            )
            .with_value(value)
            .into()),
        }
    }
}

/// Scope a discount applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountApplicationType {
    /// Whole order, shipping excluded.
    OrderWithoutShipping,
    /// One chosen product.
    SpecificProduct {
        /// Discounted product.
        product_id: ProductId,
    },
    /// Cheapest product in the cart.
    CheapestProduct,
    /// Products matching the rule's product restrictions.
    SelectedProducts,
}

impl DiscountApplicationType {
    /// Creates an application type from its tag and optional scope product.
    ///
    /// The product is required for [`DiscountApplicationKind::SpecificProduct`]
    /// and ignored for every other kind.
    pub fn new(kind: DiscountApplicationKind, product_id: Option<ProductId>) -> AppResult<Self> {
        match kind {
            DiscountApplicationKind::OrderWithoutShipping => Ok(Self::OrderWithoutShipping),
            DiscountApplicationKind::SpecificProduct => product_id
                .map(|product_id| Self::SpecificProduct { product_id })
                .ok_or_else(|| {
                    AppError::constraint(
                        ConstraintCode::MissingDiscountApplicationProduct,
                        "specific_product",
                    )
                }),
            DiscountApplicationKind::CheapestProduct => Ok(Self::CheapestProduct),
            DiscountApplicationKind::SelectedProducts => Ok(Self::SelectedProducts),
        }
    }

    /// Returns the tag of this application type.
    #[must_use]
    pub fn kind(&self) -> DiscountApplicationKind {
        match self {
            Self::OrderWithoutShipping => DiscountApplicationKind::OrderWithoutShipping,
            Self::SpecificProduct { .. } => DiscountApplicationKind::SpecificProduct,
            Self::CheapestProduct => DiscountApplicationKind::CheapestProduct,
            Self::SelectedProducts => DiscountApplicationKind::SelectedProducts,
        }
    }

    /// Returns the scope product for specific-product discounts.
    #[must_use]
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            Self::SpecificProduct { product_id } => Some(*product_id),
            _ => None,
        }
    }

    /// Returns whether a fixed-amount discount may use this scope.
    #[must_use]
    pub fn allows_amount_discount(&self) -> bool {
        matches!(
            self,
            Self::OrderWithoutShipping | Self::SpecificProduct { .. }
        )
    }
}
