use std::str::FromStr;

use cartrule_core::{AppResult, ConstraintCode};
use cartrule_domain::{
    AmountDiscount, CartRuleAction, CombinationId, CurrencyId, DiscountApplicationType,
    GiftProduct, Money, PercentageDiscount, ProductId,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use super::CartRuleActionBuilder;
use crate::{CartRuleActionFormData, FormDataBuilder};

fn build(data: Value) -> AppResult<CartRuleAction> {
    CartRuleActionBuilder::new().build(&data)
}

fn built(data: Value) -> CartRuleAction {
    build(data).unwrap_or_else(|error| panic!("expected action, got {error}"))
}

fn assert_rejected(data: Value, expected: ConstraintCode) {
    match build(data) {
        Ok(action) => panic!("expected {expected}, built {action:?}"),
        Err(error) => assert_eq!(error.constraint_code(), Some(expected), "{error}"),
    }
}

fn supports(data: Value) -> bool {
    CartRuleActionBuilder::new().supports(&data)
}

fn decimal(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|_| panic!("test"))
}

fn product(id: i64) -> ProductId {
    ProductId::new(id).unwrap_or_else(|_| panic!("test"))
}

fn gift(product_id: i64, combination_id: Option<i64>) -> GiftProduct {
    let combination_id = combination_id
        .and_then(|value| CombinationId::from_form(value).unwrap_or_else(|_| panic!("test")));
    GiftProduct::new(product(product_id), combination_id)
}

fn plain_action(free_shipping: bool, gift_product: Option<GiftProduct>) -> CartRuleAction {
    CartRuleAction::new(free_shipping, gift_product, None).unwrap_or_else(|_| panic!("test"))
}

fn amount_action(
    value: &str,
    free_shipping: bool,
    application_type: DiscountApplicationType,
    gift_product: Option<GiftProduct>,
) -> CartRuleAction {
    let currency_id = CurrencyId::new(3).unwrap_or_else(|_| panic!("test"));
    let discount = AmountDiscount::new(
        Money::new(decimal(value), currency_id, true),
        application_type,
    )
    .unwrap_or_else(|_| panic!("test"));

    CartRuleAction::new(free_shipping, gift_product, Some(discount.into()))
        .unwrap_or_else(|_| panic!("test"))
}

fn percentage_action(
    value: &str,
    apply_to_discounted_products: bool,
    free_shipping: bool,
    application_type: DiscountApplicationType,
    gift_product: Option<GiftProduct>,
) -> CartRuleAction {
    let discount =
        PercentageDiscount::new(decimal(value), apply_to_discounted_products, application_type)
            .unwrap_or_else(|_| panic!("test"));

    CartRuleAction::new(free_shipping, gift_product, Some(discount.into()))
        .unwrap_or_else(|_| panic!("test"))
}

#[test]
fn supports_free_shipping_either_way() {
    assert!(supports(json!({"free_shipping": true})));
    assert!(supports(json!({"free_shipping": false})));
}

#[test]
fn supports_gift_product_with_product_id() {
    assert!(supports(json!({"gift_product": [{"product_id": 2}]})));
    assert!(supports(json!({"gift_product": [{"product_id": 2, "combination_id": 4}]})));
}

#[test]
fn supports_complete_discounts() {
    assert!(supports(json!({
        "discount": {
            "reduction": {"type": "amount", "value": "30"},
            "discount_application": "order_without_shipping"
        }
    })));
    assert!(supports(json!({
        "discount": {
            "reduction": {"type": "percentage", "value": "90"},
            "discount_application": "specific_product",
            "specific_product": 14
        }
    })));
}

#[test]
fn does_not_support_malformed_roots() {
    assert!(!supports(json!([[]])));
    assert!(!supports(json!(["discount"])));
    assert!(!supports(json!({})));
    assert!(!supports(json!({"free_shipping": "yes"})));
}

#[test]
fn does_not_support_partial_discounts() {
    assert!(!supports(json!({
        "discount": {
            "reduction": {"type": "percentage"},
            "discount_application": "order_without_shipping"
        }
    })));
    assert!(!supports(json!({
        "discount": {
            "reduction": {"value": "144"},
            "discount_application": "order_without_shipping"
        }
    })));
    assert!(!supports(json!({
        "discount": {
            "reduction": {"value": "144", "type": "amount"}
        }
    })));
}

#[test]
fn does_not_support_empty_gift_rows() {
    assert!(!supports(json!({"gift_product": []})));
    assert!(!supports(json!({"gift_product": [{}]})));
}

#[test]
fn free_shipping_false_alone_is_supported_but_missing_an_action() {
    let data = json!({"free_shipping": false});
    assert!(supports(data.clone()));
    assert_rejected(data, ConstraintCode::MissingAction);
}

#[test]
fn empty_gift_row_is_missing_an_action() {
    assert_rejected(json!({"gift_product": [{}]}), ConstraintCode::MissingAction);
}

#[test]
fn zero_gift_product_id_is_invalid() {
    assert_rejected(
        json!({"gift_product": [{"product_id": 0}]}),
        ConstraintCode::InvalidProductId,
    );
}

#[test]
fn non_numeric_gift_product_id_is_invalid() {
    assert_rejected(
        json!({"gift_product": [{"product_id": "abc"}]}),
        ConstraintCode::InvalidProductId,
    );
}

#[test]
fn negative_gift_combination_id_is_invalid() {
    assert_rejected(
        json!({"gift_product": [{"product_id": 3, "combination_id": -1}]}),
        ConstraintCode::InvalidCombinationId,
    );
}

#[test]
fn zero_reduction_values_are_missing_an_action() {
    for reduction_type in ["amount", "percentage"] {
        assert_rejected(
            json!({
                "discount": {
                    "reduction": {"value": 0, "type": reduction_type},
                    "discount_application": "order_without_shipping"
                }
            }),
            ConstraintCode::MissingAction,
        );
    }
}

#[test]
fn blank_reduction_value_is_missing_an_action() {
    assert_rejected(
        json!({
            "discount": {
                "reduction": {"value": "", "type": "percentage"},
                "discount_application": "order_without_shipping"
            }
        }),
        ConstraintCode::MissingAction,
    );
}

#[test]
fn zero_reduction_with_free_shipping_builds_free_shipping() {
    let action = built(json!({
        "free_shipping": true,
        "discount": {
            "reduction": {"value": "0.00", "type": "amount", "currency": 1},
            "discount_application": "order_without_shipping"
        }
    }));
    assert_eq!(action, plain_action(true, None));
}

#[test]
fn unknown_reduction_type_is_invalid() {
    assert_rejected(
        json!({
            "discount": {
                "reduction": {"value": "10", "type": "woah"},
                "discount_application": "order_without_shipping"
            }
        }),
        ConstraintCode::InvalidReductionType,
    );
}

#[test]
fn negative_percentage_is_invalid() {
    assert_rejected(
        json!({
            "discount": {
                "reduction": {"value": "-150", "type": "percentage"},
                "discount_application": "order_without_shipping"
            }
        }),
        ConstraintCode::InvalidReductionPercentage,
    );
}

#[test]
fn percentage_above_one_hundred_is_invalid() {
    assert_rejected(
        json!({
            "discount": {
                "reduction": {"value": "100.5", "type": "percentage"},
                "discount_application": "cheapest_product"
            }
        }),
        ConstraintCode::InvalidReductionPercentage,
    );
}

#[test]
fn negative_amount_is_invalid() {
    assert_rejected(
        json!({
            "discount": {
                "reduction": {
                    "value": "-150",
                    "type": "amount",
                    "currency": 1,
                    "include_tax": true
                },
                "discount_application": "order_without_shipping"
            }
        }),
        ConstraintCode::InvalidReductionAmount,
    );
}

#[test]
fn non_numeric_amount_is_invalid() {
    assert_rejected(
        json!({
            "discount": {
                "reduction": {"value": "lots", "type": "amount", "currency": 1},
                "discount_application": "order_without_shipping"
            }
        }),
        ConstraintCode::InvalidReductionAmount,
    );
}

#[test]
fn amount_discount_rejects_cheapest_and_selected_product_scopes() {
    for application in ["cheapest_product", "selected_products"] {
        assert_rejected(
            json!({
                "discount": {
                    "reduction": {
                        "value": "150",
                        "type": "amount",
                        "currency": 1,
                        "include_tax": true
                    },
                    "discount_application": application
                }
            }),
            ConstraintCode::InvalidDiscountApplicationType,
        );
    }
}

#[test]
fn unknown_application_tag_is_invalid() {
    assert_rejected(
        json!({
            "discount": {
                "reduction": {"value": "15", "type": "percentage"},
                "discount_application": "whole_catalog"
            }
        }),
        ConstraintCode::InvalidDiscountApplicationType,
    );
}

#[test]
fn amount_without_currency_is_invalid() {
    let data = json!({
        "discount": {
            "reduction": {"type": "amount", "value": "30"},
            "discount_application": "order_without_shipping"
        }
    });
    assert!(supports(data.clone()));
    assert_rejected(data, ConstraintCode::InvalidCurrencyId);
}

#[test]
fn specific_product_without_product_is_invalid() {
    assert_rejected(
        json!({
            "discount": {
                "reduction": {"type": "percentage", "value": "20"},
                "discount_application": "specific_product",
                "specific_product": []
            }
        }),
        ConstraintCode::MissingDiscountApplicationProduct,
    );
}

#[test]
fn violation_reports_form_field_path() {
    let error = build(json!({"gift_product": [{"product_id": -5}]})).err();
    let violation = match error {
        Some(cartrule_core::AppError::Constraint(violation)) => violation,
        other => panic!("expected constraint violation, got {other:?}"),
    };

    assert_eq!(violation.field(), "gift_product[0].product_id");
    assert_eq!(violation.value(), Some("-5"));
}

#[test]
fn malformed_payload_is_a_validation_error() {
    let error = build(json!(["discount"])).err();
    assert!(matches!(
        error,
        Some(cartrule_core::AppError::Validation(_))
    ));
}

#[test]
fn free_shipping_is_recognized_next_to_a_malformed_discount() {
    let data = json!({"free_shipping": true, "discount": {"apply_to_discounted_products": "1"}});

    assert!(supports(data.clone()));
    assert_eq!(built(data), plain_action(true, None));
}

#[test]
fn free_shipping_is_recognized_next_to_sections_of_the_wrong_shape() {
    let data = json!({"free_shipping": true, "gift_product": "17", "discount": "none"});

    assert!(supports(data.clone()));
    assert_eq!(built(data), plain_action(true, None));
}

#[test]
fn wrongly_typed_gift_product_id_is_invalid() {
    let data = json!({"free_shipping": true, "gift_product": [{"product_id": true}]});
    assert!(supports(data.clone()));

    let violation = match build(data).err() {
        Some(cartrule_core::AppError::Constraint(violation)) => violation,
        other => panic!("expected constraint violation, got {other:?}"),
    };
    assert_eq!(violation.code(), ConstraintCode::InvalidProductId);
    assert_eq!(violation.field(), "gift_product[0].product_id");
    assert_eq!(violation.value(), Some("true"));
}

#[test]
fn gift_product_is_recognized_next_to_a_loose_tax_flag() {
    let data = json!({
        "gift_product": [{"product_id": 2}],
        "discount": {"reduction": {"include_tax": 1}}
    });

    assert!(supports(data.clone()));
    assert_eq!(built(data), plain_action(false, Some(gift(2, None))));
}

#[test]
fn wrongly_typed_tags_report_their_constraint() {
    assert_rejected(
        json!({
            "discount": {
                "reduction": {"value": "10", "type": true},
                "discount_application": "order_without_shipping"
            }
        }),
        ConstraintCode::InvalidReductionType,
    );
    assert_rejected(
        json!({
            "discount": {
                "reduction": {"value": "10", "type": "percentage"},
                "discount_application": 4
            }
        }),
        ConstraintCode::InvalidDiscountApplicationType,
    );
}

#[test]
fn wrongly_typed_currency_is_invalid() {
    assert_rejected(
        json!({
            "discount": {
                "reduction": {"value": "10", "type": "amount", "currency": {"id": 1}},
                "discount_application": "order_without_shipping"
            }
        }),
        ConstraintCode::InvalidCurrencyId,
    );
}

#[test]
fn loose_checkboxes_are_read_as_flags() {
    let action = built(json!({
        "free_shipping": "1",
        "discount": {
            "discount_application": "order_without_shipping",
            "reduction": {"type": "percentage", "value": "50"},
            "apply_to_discounted_products": "1"
        }
    }));

    assert!(action.free_shipping());
    assert_eq!(
        action,
        percentage_action(
            "50",
            true,
            true,
            DiscountApplicationType::OrderWithoutShipping,
            None
        )
    );
}

#[test]
fn serialized_empty_action_cannot_be_built_back() {
    let data = json!({"free_shipping": false, "gift_product": null, "discount": null});

    assert!(supports(data.clone()));
    assert_rejected(data, ConstraintCode::MissingAction);
}

#[test]
fn builds_free_shipping_actions() {
    assert_eq!(
        built(json!({"free_shipping": true})),
        plain_action(true, None)
    );
    assert_eq!(
        built(json!({"free_shipping": true, "gift_product": [{"product_id": 17}]})),
        plain_action(true, Some(gift(17, None)))
    );
    assert_eq!(
        built(json!({
            "free_shipping": true,
            "gift_product": [{"product_id": 17, "combination_id": 12}]
        })),
        plain_action(true, Some(gift(17, Some(12))))
    );
}

#[test]
fn builds_gift_product_actions() {
    assert_eq!(
        built(json!({"gift_product": [{"product_id": 16}]})),
        plain_action(false, Some(gift(16, None)))
    );
    assert_eq!(
        built(json!({"gift_product": [{"product_id": "16", "combination_id": "18"}]})),
        plain_action(false, Some(gift(16, Some(18))))
    );
}

#[test]
fn only_first_gift_row_is_used() {
    assert_eq!(
        built(json!({"gift_product": [{"product_id": 16}, {"product_id": 0}]})),
        plain_action(false, Some(gift(16, None)))
    );
}

#[test]
fn builds_amount_discount_actions() {
    assert_eq!(
        built(json!({
            "discount": {
                "discount_application": "order_without_shipping",
                "reduction": {
                    "type": "amount",
                    "value": "11.23",
                    "include_tax": true,
                    "currency": 3
                }
            }
        })),
        amount_action(
            "11.23",
            false,
            DiscountApplicationType::OrderWithoutShipping,
            None
        )
    );

    let specific_product = DiscountApplicationType::SpecificProduct {
        product_id: product(10),
    };
    assert_eq!(
        built(json!({
            "discount": {
                "discount_application": "specific_product",
                "specific_product": [{"id": 10}],
                "reduction": {
                    "type": "amount",
                    "value": "11.23",
                    "include_tax": true,
                    "currency": 3
                }
            }
        })),
        amount_action("11.23", false, specific_product, None)
    );
    assert_eq!(
        built(json!({
            "discount": {
                "discount_application": "specific_product",
                "specific_product": [{"id": 10}],
                "reduction": {
                    "type": "amount",
                    "value": "11.23",
                    "include_tax": true,
                    "currency": 3
                }
            },
            "gift_product": [{"product_id": 14}]
        })),
        amount_action("11.23", false, specific_product, Some(gift(14, None)))
    );
    assert_eq!(
        built(json!({
            "free_shipping": true,
            "discount": {
                "discount_application": "specific_product",
                "specific_product": [{"id": 10}],
                "reduction": {
                    "type": "amount",
                    "value": "11.23",
                    "include_tax": true,
                    "currency": 3
                }
            },
            "gift_product": [{"product_id": 14, "combination_id": 12}]
        })),
        amount_action("11.23", true, specific_product, Some(gift(14, Some(12))))
    );
}

#[test]
fn amount_discount_defaults_to_tax_excluded() {
    let action = built(json!({
        "discount": {
            "discount_application": "order_without_shipping",
            "reduction": {"type": "amount", "value": 5, "currency": "2"}
        }
    }));
    let money = match action.discount() {
        Some(cartrule_domain::DiscountAction::Amount(discount)) => discount.money(),
        other => panic!("expected amount discount, got {other:?}"),
    };

    assert!(!money.tax_included());
    assert_eq!(money.currency_id().value(), 2);
    assert_eq!(money.amount(), decimal("5"));
}

#[test]
fn builds_percentage_discount_actions() {
    let order = DiscountApplicationType::OrderWithoutShipping;

    for free_shipping in [json!(null), json!(false)] {
        assert_eq!(
            built(json!({
                "free_shipping": free_shipping,
                "discount": {
                    "discount_application": "order_without_shipping",
                    "reduction": {"type": "percentage", "value": "11.23"},
                    "apply_to_discounted_products": false
                }
            })),
            percentage_action("11.23", false, false, order, None)
        );
    }

    assert_eq!(
        built(json!({
            "free_shipping": true,
            "discount": {
                "discount_application": "order_without_shipping",
                "reduction": {"type": "percentage", "value": "11.23"},
                "apply_to_discounted_products": false
            }
        })),
        percentage_action("11.23", false, true, order, None)
    );

    assert_eq!(
        built(json!({
            "discount": {
                "discount_application": "specific_product",
                "specific_product": [{"id": 13}],
                "reduction": {"type": "percentage", "value": "50"},
                "apply_to_discounted_products": true
            }
        })),
        percentage_action(
            "50",
            true,
            false,
            DiscountApplicationType::SpecificProduct {
                product_id: product(13)
            },
            None
        )
    );

    assert_eq!(
        built(json!({
            "discount": {
                "discount_application": "order_without_shipping",
                "reduction": {"type": "percentage", "value": "50"}
            },
            "gift_product": [{"product_id": 15}]
        })),
        percentage_action("50", false, false, order, Some(gift(15, None)))
    );

    assert_eq!(
        built(json!({
            "discount": {
                "discount_application": "order_without_shipping",
                "reduction": {"type": "percentage", "value": "50"}
            },
            "gift_product": [{"product_id": 15, "combination_id": 32}]
        })),
        percentage_action("50", false, false, order, Some(gift(15, Some(32))))
    );
}

#[test]
fn percentage_discount_allows_every_scope() {
    for (application, expected) in [
        ("cheapest_product", DiscountApplicationType::CheapestProduct),
        ("selected_products", DiscountApplicationType::SelectedProducts),
    ] {
        assert_eq!(
            built(json!({
                "discount": {
                    "discount_application": application,
                    "reduction": {"type": "percentage", "value": 25.5}
                }
            })),
            percentage_action("25.5", false, false, expected, None)
        );
    }
}

#[test]
fn edit_form_data_rebuilds_the_same_action() {
    let action = amount_action(
        "11.23",
        true,
        DiscountApplicationType::SpecificProduct {
            product_id: product(10),
        },
        Some(gift(14, Some(12))),
    );
    let data = CartRuleActionFormData::from_action(&action)
        .to_value()
        .unwrap_or_else(|error| panic!("{error}"));

    assert_eq!(data["discount"]["specific_product"], json!([{"id": 10}]));
    assert_eq!(data["discount"]["reduction"]["value"], json!("11.23"));
    assert_eq!(built(data), action);
}

fn action_form_data() -> impl Strategy<Value = Value> {
    let gift_product = prop::option::of((1_i64..5_000, prop::option::of(0_i64..200)));
    let discount = prop::option::of((
        prop::bool::ANY,
        1_i64..=10_000,
        prop::sample::select(vec![
            "order_without_shipping",
            "specific_product",
            "cheapest_product",
            "selected_products",
        ]),
        1_i64..5_000,
        prop::bool::ANY,
    ));

    (prop::option::of(prop::bool::ANY), gift_product, discount).prop_map(
        |(free_shipping, gift_product, discount)| {
            let mut data = json!({});
            if let Some(free_shipping) = free_shipping {
                data["free_shipping"] = json!(free_shipping);
            }
            if let Some((product_id, combination_id)) = gift_product {
                let mut entry = json!({"product_id": product_id});
                if let Some(combination_id) = combination_id {
                    entry["combination_id"] = json!(combination_id);
                }
                data["gift_product"] = json!([entry]);
            }
            if let Some((is_amount, cents, application, scope_product, flag)) = discount {
                let value = Decimal::new(cents, 2).to_string();
                let reduction = if is_amount {
                    json!({"type": "amount", "value": value, "currency": 1, "include_tax": flag})
                } else {
                    json!({"type": "percentage", "value": value})
                };
                data["discount"] = json!({
                    "reduction": reduction,
                    "discount_application": application,
                    "specific_product": [{"id": scope_product}],
                    "apply_to_discounted_products": flag
                });
            }
            data
        },
    )
}

fn descriptorless_form_data() -> impl Strategy<Value = Value> {
    let free_shipping = prop_oneof![
        Just(None::<Value>),
        Just(Some(json!("true"))),
        (0_i64..2).prop_map(|flag| Some(json!(flag))),
    ];
    let gift_product = prop_oneof![
        Just(None::<Value>),
        Just(Some(json!([]))),
        Just(Some(json!("17"))),
        prop::option::of(0_i64..200).prop_map(|combination_id| {
            Some(json!([{"product_id": null, "combination_id": combination_id}]))
        }),
    ];
    let discount = prop_oneof![
        Just(None::<Value>),
        (
            prop::sample::select(vec!["type", "value", "discount_application"]),
            prop::bool::ANY,
        )
            .prop_map(|(missing, as_null)| {
                let mut discount = json!({
                    "reduction": {"type": "percentage", "value": "10", "currency": 1},
                    "discount_application": "order_without_shipping",
                    "specific_product": [{"id": 3}],
                    "apply_to_discounted_products": true
                });
                let section = match missing {
                    "discount_application" => &mut discount,
                    _ => &mut discount["reduction"],
                };
                if as_null {
                    section[missing] = Value::Null;
                } else if let Some(fields) = section.as_object_mut() {
                    fields.remove(missing);
                }
                Some(discount)
            }),
    ];

    (free_shipping, gift_product, discount).prop_map(|(free_shipping, gift_product, discount)| {
        let mut data = serde_json::Map::new();
        for (key, value) in [
            ("free_shipping", free_shipping),
            ("gift_product", gift_product),
            ("discount", discount),
        ] {
            if let Some(value) = value {
                data.insert(key.to_owned(), value);
            }
        }
        Value::Object(data)
    })
}

proptest! {
    #[test]
    fn data_without_a_descriptor_is_not_supported(data in descriptorless_form_data()) {
        prop_assert!(!supports(data));
    }

    #[test]
    fn build_is_idempotent(data in action_form_data()) {
        let first = build(data.clone()).map_err(|error| error.to_string());
        let second = build(data).map_err(|error| error.to_string());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn supported_data_builds_or_reports_a_constraint(data in action_form_data()) {
        prop_assume!(supports(data.clone()));
        if let Err(error) = build(data) {
            prop_assert!(error.constraint_code().is_some(), "{}", error);
        }
    }

    #[test]
    fn built_actions_round_trip_through_edit_form_data(data in action_form_data()) {
        if let Ok(action) = build(data) {
            let edit_data = CartRuleActionFormData::from_action(&action).to_value();
            prop_assert!(edit_data.is_ok());
            let rebuilt = edit_data.map(build);
            prop_assert!(matches!(rebuilt, Ok(Ok(rebuilt)) if rebuilt == action));
        }
    }
}
