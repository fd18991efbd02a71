//! Builds cart rule actions from the admin "actions" sub-form.
//!
//! Resolution order is fixed: gift product, then discount, then free
//! shipping. The first invalid field aborts the build.

mod discount;
mod gift_product;

#[cfg(test)]
mod tests;

use cartrule_core::{AppError, AppResult, ConstraintCode, ConstraintViolation};
use cartrule_domain::CartRuleAction;
use serde_json::Value;
use tracing::debug;

use crate::FormDataBuilder;
use crate::cart_rule_action_form::{CartRuleActionFormData, FormFlag, FormNumber};

/// Stateless builder for [`CartRuleAction`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CartRuleActionBuilder;

impl CartRuleActionBuilder {
    /// Creates a builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds an action from already decoded form data.
    pub fn build_from_form(&self, form: &CartRuleActionFormData) -> AppResult<CartRuleAction> {
        let gift_product = self.resolve_gift_product(form.first_gift_product())?;
        let discount = match form.discount.as_ref() {
            Some(discount) => self.resolve_discount(discount)?,
            None => None,
        };
        let free_shipping = form.free_shipping.as_ref().is_some_and(FormFlag::as_bool);

        CartRuleAction::new(free_shipping, gift_product, discount)
    }
}

impl FormDataBuilder for CartRuleActionBuilder {
    type Output = CartRuleAction;

    fn supports(&self, data: &Value) -> bool {
        CartRuleActionFormData::decode(data).is_ok_and(|form| form.describes_action())
    }

    fn build(&self, data: &Value) -> AppResult<CartRuleAction> {
        let form = CartRuleActionFormData::decode(data)?;
        let result = self.build_from_form(&form);

        match &result {
            Ok(action) => debug!(
                free_shipping = action.free_shipping(),
                gift_product = action.gift_product().is_some(),
                reduction_type = action
                    .discount()
                    .map(|discount| discount.reduction_type().as_str()),
                "built cart rule action"
            ),
            Err(error) => debug!(%error, "rejected cart rule action form data"),
        }

        result
    }
}

/// Reads an integer form leaf, reporting `code` on `field` when it is not one.
fn integer_field(value: &FormNumber, code: ConstraintCode, field: &str) -> AppResult<i64> {
    value.as_integer().ok_or_else(|| {
        AppError::from(ConstraintViolation::new(code, field).with_value(value))
    })
}
