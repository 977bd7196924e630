use serde::{Deserialize, Serialize};

use crate::domain::product::ValueBand;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetBand {
    Tight,
    Normal,
}

/// Shopper preferences held on the session for later personalisation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub diet_tags: Vec<String>,
    pub avoid_brands: Vec<String>,
    pub value_bias: ValueBand,
    pub budget_band: BudgetBand,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            diet_tags: Vec::new(),
            avoid_brands: Vec::new(),
            value_bias: ValueBand::Mid,
            budget_band: BudgetBand::Normal,
        }
    }
}
