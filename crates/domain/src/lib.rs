//! Cart rule domain value objects and invariants.

#![forbid(unsafe_code)]

mod cart_rule_action;
mod catalog;
mod discount_application;
mod money;
mod reduction;

pub use cart_rule_action::{AmountDiscount, CartRuleAction, DiscountAction, PercentageDiscount};
pub use catalog::{CombinationId, GiftProduct, ProductId};
pub use discount_application::{DiscountApplicationKind, DiscountApplicationType};
pub use money::{CurrencyId, Money};
pub use reduction::{Reduction, ReductionType};
