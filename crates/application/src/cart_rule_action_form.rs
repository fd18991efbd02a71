//! Typed shape of the cart rule "actions" sub-form.
//!
//! Admin forms submit loosely typed nested data: ids arrive as integers or
//! numeric strings, and absent fields may be `null`. Decoding into these
//! structs happens once at the boundary. A wrongly typed leaf never fails
//! decoding; it is kept as is and reported by the builder against its field.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use cartrule_core::{AppError, AppResult};
use cartrule_domain::{CartRuleAction, DiscountAction, GiftProduct};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Exclusive upper bound of `i64` as a float, `2^63`.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Numeric form leaf: JSON integer, JSON float, text, or any other JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    /// JSON integer.
    Integer(i64),
    /// JSON float.
    Float(f64),
    /// Text as typed in an input field.
    Text(String),
    /// Booleans, lists and maps; never numeric.
    Unrecognized(Value),
}

impl FormNumber {
    /// Returns the value as an integer when it has no fractional part.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) => {
                let in_range =
                    value.fract() == 0.0 && (i64::MIN as f64..I64_UPPER_BOUND).contains(value);
                in_range.then_some(*value as i64)
            }
            Self::Text(value) => value.trim().parse::<i64>().ok(),
            Self::Unrecognized(_) => None,
        }
    }

    /// Returns the value as a decimal, if it is numeric.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Integer(value) => Some(Decimal::from(*value)),
            Self::Float(value) => Decimal::try_from(*value).ok(),
            Self::Text(value) => Decimal::from_str(value.trim()).ok(),
            Self::Unrecognized(_) => None,
        }
    }

    /// Returns whether this is empty text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(value) if value.trim().is_empty())
    }
}

impl Display for FormNumber {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Text(value) => write!(formatter, "{value}"),
            Self::Unrecognized(value) => write!(formatter, "{value}"),
        }
    }
}

impl From<u32> for FormNumber {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

/// Checkbox form leaf.
///
/// Only a JSON boolean counts as a recognized flag; other values are read the
/// way form submissions encode checkboxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormFlag {
    /// JSON boolean.
    Boolean(bool),
    /// Any other JSON value, such as `"1"` or `0`.
    Loose(Value),
}

impl FormFlag {
    /// Returns whether the flag is a JSON boolean.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean(_))
    }

    /// Returns whether the flag is checked.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Boolean(flag) => *flag,
            Self::Loose(Value::Null) => false,
            Self::Loose(Value::Bool(flag)) => *flag,
            Self::Loose(Value::Number(number)) => {
                number.as_f64().is_some_and(|number| number != 0.0)
            }
            Self::Loose(Value::String(text)) => !matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "" | "0" | "false" | "off" | "no"
            ),
            Self::Loose(Value::Array(items)) => !items.is_empty(),
            Self::Loose(Value::Object(fields)) => !fields.is_empty(),
        }
    }
}

impl From<bool> for FormFlag {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// One row of the gift product collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GiftProductFormData {
    /// Gifted product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<FormNumber>,
    /// Gifted combination, `0` for none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combination_id: Option<FormNumber>,
}

/// Reduction fields of the discount block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReductionFormData {
    /// Reduction tag, `amount` or `percentage`.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "text_leaf",
        skip_serializing_if = "Option::is_none"
    )]
    pub reduction_type: Option<String>,
    /// Reduction magnitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FormNumber>,
    /// Currency of an amount reduction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<FormNumber>,
    /// Whether an amount reduction includes taxes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_tax: Option<FormFlag>,
}

/// Entry returned by the product search widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSearchEntry {
    /// Selected product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FormNumber>,
}

/// Scope product of a specific-product discount.
///
/// Accepts both a bare id and the product search widget's list shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecificProductFormData {
    /// Product search selection; the first entry is used.
    Search(Vec<ProductSearchEntry>),
    /// Bare product id.
    Id(FormNumber),
}

impl SpecificProductFormData {
    /// Returns the selected product id leaf, if any.
    #[must_use]
    pub fn product_id(&self) -> Option<&FormNumber> {
        match self {
            Self::Id(value) => Some(value),
            Self::Search(entries) => entries.first().and_then(|entry| entry.id.as_ref()),
        }
    }
}

/// Discount block of the actions form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscountFormData {
    /// Reduction fields; ignored unless they form a map.
    #[serde(
        default,
        deserialize_with = "section",
        skip_serializing_if = "Option::is_none"
    )]
    pub reduction: Option<ReductionFormData>,
    /// Application tag.
    #[serde(
        default,
        deserialize_with = "text_leaf",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_application: Option<String>,
    /// Scope product for `specific_product` applications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_product: Option<SpecificProductFormData>,
    /// Whether already discounted products are reduced too.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_to_discounted_products: Option<FormFlag>,
}

impl DiscountFormData {
    /// Returns whether reduction type, reduction value and application tag are all set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let reduction_complete = self
            .reduction
            .as_ref()
            .is_some_and(|reduction| reduction.reduction_type.is_some() && reduction.value.is_some());

        reduction_complete && self.discount_application.is_some()
    }
}

/// Decoded cart rule actions form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartRuleActionFormData {
    /// Free shipping checkbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_shipping: Option<FormFlag>,
    /// Gift product collection; only the first row is used.
    #[serde(
        default,
        deserialize_with = "rows",
        skip_serializing_if = "Option::is_none"
    )]
    pub gift_product: Option<Vec<GiftProductFormData>>,
    /// Discount block; ignored unless it is a map.
    #[serde(
        default,
        deserialize_with = "section",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount: Option<DiscountFormData>,
}

impl CartRuleActionFormData {
    /// Decodes raw form data.
    ///
    /// The root must be an object. Each descriptor decodes on its own, so a
    /// malformed section never hides a well-formed one.
    pub fn decode(data: &Value) -> AppResult<Self> {
        if !data.is_object() {
            return Err(AppError::Validation(
                "cart rule action form data must be an object".to_owned(),
            ));
        }

        serde_json::from_value(data.clone()).map_err(|error| {
            AppError::Validation(format!("malformed cart rule action form data: {error}"))
        })
    }

    /// Returns whether the form names at least one recognizable action.
    ///
    /// This does not guarantee the action builds: `free_shipping: false`
    /// alone is recognized but describes no effective action.
    #[must_use]
    pub fn describes_action(&self) -> bool {
        let has_gift_product = self
            .first_gift_product()
            .is_some_and(|entry| entry.product_id.is_some());

        self.free_shipping.as_ref().is_some_and(FormFlag::is_boolean)
            || has_gift_product
            || self.discount.as_ref().is_some_and(DiscountFormData::is_complete)
    }

    /// Returns the first gift product row.
    #[must_use]
    pub fn first_gift_product(&self) -> Option<&GiftProductFormData> {
        self.gift_product.as_ref().and_then(|entries| entries.first())
    }

    /// Builds the form data that prefills an edit form for `action`.
    #[must_use]
    pub fn from_action(action: &CartRuleAction) -> Self {
        Self {
            free_shipping: Some(action.free_shipping().into()),
            gift_product: action
                .gift_product()
                .map(|gift_product| vec![gift_product_form_data(gift_product)]),
            discount: action.discount().map(discount_form_data),
        }
    }

    /// Encodes the form data back to a JSON value.
    pub fn to_value(&self) -> AppResult<Value> {
        serde_json::to_value(self).map_err(|error| {
            AppError::Internal(format!("failed to encode cart rule action form data: {error}"))
        })
    }
}

/// Reads a map section, treating any other shape as absent.
fn section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .filter(Value::is_object)
        .and_then(|value| serde_json::from_value(value).ok()))
}

/// Reads a row collection; rows that are not maps decode as empty rows.
fn rows<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let Some(Value::Array(entries)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    Ok(Some(
        entries
            .into_iter()
            .map(|entry| serde_json::from_value(entry).unwrap_or_default())
            .collect(),
    ))
}

/// Reads a tag leaf; non-text values keep their JSON spelling.
fn text_leaf<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.map(|value| match value {
        Value::String(text) => text,
        other => other.to_string(),
    }))
}

fn gift_product_form_data(gift_product: &GiftProduct) -> GiftProductFormData {
    GiftProductFormData {
        product_id: Some(gift_product.product_id().value().into()),
        combination_id: gift_product
            .combination_id()
            .map(|combination_id| combination_id.value().into()),
    }
}

fn discount_form_data(discount: &DiscountAction) -> DiscountFormData {
    let application_type = discount.application_type();
    let specific_product = application_type.product_id().map(|product_id| {
        SpecificProductFormData::Search(vec![ProductSearchEntry {
            id: Some(product_id.value().into()),
        }])
    });

    let (reduction, apply_to_discounted_products) = match discount {
        DiscountAction::Amount(amount) => (
            ReductionFormData {
                reduction_type: Some(discount.reduction_type().as_str().to_owned()),
                value: Some(FormNumber::Text(amount.money().amount().to_string())),
                currency: Some(amount.money().currency_id().value().into()),
                include_tax: Some(amount.money().tax_included().into()),
            },
            None,
        ),
        DiscountAction::Percentage(percentage) => (
            ReductionFormData {
                reduction_type: Some(discount.reduction_type().as_str().to_owned()),
                value: Some(FormNumber::Text(percentage.percentage().to_string())),
                currency: None,
                include_tax: None,
            },
            Some(percentage.apply_to_discounted_products().into()),
        ),
    };

    DiscountFormData {
        reduction: Some(reduction),
        discount_application: Some(application_type.kind().as_str().to_owned()),
        specific_product,
        apply_to_discounted_products,
    }
}
