use std::str::FromStr;

use cartrule_domain::{
    AmountDiscount, CurrencyId, DiscountAction, DiscountApplicationKind, DiscountApplicationType,
    Money, PercentageDiscount, ProductId, Reduction, ReductionType,
};

use super::*;
use crate::cart_rule_action_form::{DiscountFormData, ReductionFormData};

const TYPE_FIELD: &str = "discount.reduction.type";
const VALUE_FIELD: &str = "discount.reduction.value";
const CURRENCY_FIELD: &str = "discount.reduction.currency";
const APPLICATION_FIELD: &str = "discount.discount_application";
const SPECIFIC_PRODUCT_FIELD: &str = "discount.specific_product";

impl CartRuleActionBuilder {
    /// Resolves the discount block.
    ///
    /// Incomplete blocks and zero or empty reduction values yield no discount.
    /// Amount reductions resolve their currency before the application scope.
    pub(super) fn resolve_discount(
        &self,
        discount: &DiscountFormData,
    ) -> AppResult<Option<DiscountAction>> {
        let (Some(reduction), Some(application_tag)) = (
            discount.reduction.as_ref(),
            discount.discount_application.as_deref(),
        ) else {
            return Ok(None);
        };

        let Some(reduction_value) = self.resolve_reduction(reduction)? else {
            return Ok(None);
        };

        let action: DiscountAction = match reduction_value.reduction_type() {
            ReductionType::Amount => {
                let money = Money::new(
                    reduction_value.value(),
                    self.resolve_currency(reduction)?,
                    reduction.include_tax.as_ref().is_some_and(FormFlag::as_bool),
                );
                let application_type = self.resolve_application_type(application_tag, discount)?;

                AmountDiscount::new(money, application_type)
                    .map_err(|error| error.at_field(APPLICATION_FIELD))?
                    .into()
            }
            ReductionType::Percentage => {
                let application_type = self.resolve_application_type(application_tag, discount)?;

                PercentageDiscount::new(
                    reduction_value.value(),
                    discount
                        .apply_to_discounted_products
                        .as_ref()
                        .is_some_and(FormFlag::as_bool),
                    application_type,
                )
                .map_err(|error| error.at_field(VALUE_FIELD))?
                .into()
            }
        };

        Ok(Some(action))
    }

    fn resolve_reduction(&self, reduction: &ReductionFormData) -> AppResult<Option<Reduction>> {
        let (Some(type_tag), Some(value)) =
            (reduction.reduction_type.as_deref(), reduction.value.as_ref())
        else {
            return Ok(None);
        };

        let reduction_type =
            ReductionType::from_str(type_tag).map_err(|error| error.at_field(TYPE_FIELD))?;

        if value.is_blank() {
            return Ok(None);
        }

        let decimal = value.as_decimal().ok_or_else(|| {
            AppError::from(
                ConstraintViolation::new(reduction_type.invalid_value_code(), VALUE_FIELD)
                    .with_value(value),
            )
        })?;
        if decimal.is_zero() {
            return Ok(None);
        }

        Reduction::new(reduction_type, decimal)
            .map(Some)
            .map_err(|error| error.at_field(VALUE_FIELD))
    }

    fn resolve_currency(&self, reduction: &ReductionFormData) -> AppResult<CurrencyId> {
        let currency = reduction.currency.as_ref().ok_or_else(|| {
            AppError::constraint(ConstraintCode::InvalidCurrencyId, CURRENCY_FIELD)
        })?;

        integer_field(currency, ConstraintCode::InvalidCurrencyId, CURRENCY_FIELD)
            .and_then(CurrencyId::new)
            .map_err(|error| error.at_field(CURRENCY_FIELD))
    }

    fn resolve_application_type(
        &self,
        application_tag: &str,
        discount: &DiscountFormData,
    ) -> AppResult<DiscountApplicationType> {
        let kind = DiscountApplicationKind::from_str(application_tag)
            .map_err(|error| error.at_field(APPLICATION_FIELD))?;

        let product_id = match kind {
            DiscountApplicationKind::SpecificProduct => discount
                .specific_product
                .as_ref()
                .and_then(|specific_product| specific_product.product_id())
                .map(|product_id| {
                    integer_field(
                        product_id,
                        ConstraintCode::InvalidProductId,
                        SPECIFIC_PRODUCT_FIELD,
                    )
                    .and_then(ProductId::new)
                    .map_err(|error| error.at_field(SPECIFIC_PRODUCT_FIELD))
                })
                .transpose()?,
            _ => None,
        };

        DiscountApplicationType::new(kind, product_id)
            .map_err(|error| error.at_field(SPECIFIC_PRODUCT_FIELD))
    }
}
