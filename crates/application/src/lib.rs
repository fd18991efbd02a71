//! Application services and ports.

#![forbid(unsafe_code)]

mod cart_rule_action_builder;
mod cart_rule_action_form;
mod form_data_builder;

pub use cart_rule_action_builder::CartRuleActionBuilder;
pub use cart_rule_action_form::{
    CartRuleActionFormData, DiscountFormData, FormFlag, FormNumber, GiftProductFormData,
    ProductSearchEntry, ReductionFormData, SpecificProductFormData,
};
pub use form_data_builder::FormDataBuilder;
