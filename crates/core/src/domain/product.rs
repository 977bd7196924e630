use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Shelf positioning used for personalisation; generators ignore it today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueBand {
    Value,
    Mid,
    Premium,
}

/// Promotion attached to a product. `value` is display text such as `"3 for £2"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Promotion {
    MultiBuy {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group_id: Option<String>,
    },
    #[serde(rename = "percentage")]
    PercentageOff { value: String },
    #[serde(rename = "fixed_amount")]
    FixedAmountOff { value: String },
}

impl Promotion {
    pub const DEFAULT_MULTI_BUY_THRESHOLD: u32 = 2;

    pub fn value(&self) -> &str {
        match self {
            Self::MultiBuy { value, .. }
            | Self::PercentageOff { value }
            | Self::FixedAmountOff { value } => value,
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        match self {
            Self::MultiBuy { group_id, .. } => group_id.as_deref(),
            Self::PercentageOff { .. } | Self::FixedAmountOff { .. } => None,
        }
    }

    pub fn is_multi_buy(&self) -> bool {
        matches!(self, Self::MultiBuy { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "product_id")]
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub sub_category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub diet_tags: Vec<String>,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty_price: Option<Decimal>,
    #[serde(default, rename = "promo", skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion>,
    pub value_band: ValueBand,
    #[serde(rename = "is_in_stock")]
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// Price the shopper pays at the till: the member price when one exists.
    pub fn effective_price(&self) -> Decimal {
        self.loyalty_price.unwrap_or(self.price)
    }

    /// Per-unit saving granted by the member price.
    pub fn loyalty_saving(&self) -> Option<Decimal> {
        self.loyalty_price.map(|loyalty| self.price - loyalty)
    }

    pub fn promo_group(&self) -> Option<&str> {
        self.promotion.as_ref().and_then(Promotion::group_id)
    }
}
