use cartrule_domain::{CombinationId, GiftProduct, ProductId};

use super::*;
use crate::cart_rule_action_form::GiftProductFormData;

const PRODUCT_ID_FIELD: &str = "gift_product[0].product_id";
const COMBINATION_ID_FIELD: &str = "gift_product[0].combination_id";

impl CartRuleActionBuilder {
    /// Resolves the first gift row; rows without a product id are ignored.
    pub(super) fn resolve_gift_product(
        &self,
        entry: Option<&GiftProductFormData>,
    ) -> AppResult<Option<GiftProduct>> {
        let Some(entry) = entry else {
            return Ok(None);
        };
        let Some(product_id) = entry.product_id.as_ref() else {
            return Ok(None);
        };

        let product_id = integer_field(product_id, ConstraintCode::InvalidProductId, PRODUCT_ID_FIELD)
            .and_then(ProductId::new)
            .map_err(|error| error.at_field(PRODUCT_ID_FIELD))?;

        let combination_id = match entry.combination_id.as_ref() {
            Some(combination_id) => integer_field(
                combination_id,
                ConstraintCode::InvalidCombinationId,
                COMBINATION_ID_FIELD,
            )
            .and_then(CombinationId::from_form)
            .map_err(|error| error.at_field(COMBINATION_ID_FIELD))?,
            None => None,
        };

        Ok(Some(GiftProduct::new(product_id, combination_id)))
    }
}
