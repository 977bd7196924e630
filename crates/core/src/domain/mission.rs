use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

/// Themed bundle: scanning any trigger product activates the mission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub name: String,
    pub title: String,
    pub triggers: Vec<ProductId>,
    pub suggestions: Vec<ProductId>,
}

impl Mission {
    pub fn is_triggered_by(&self, product_id: &ProductId) -> bool {
        self.triggers.contains(product_id)
    }
}
