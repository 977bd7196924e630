use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::{Product, ProductId};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NudgeId(pub String);

impl NudgeId {
    /// `<kind>_<uuid>`; unique across rapid repeated calls.
    pub fn generate(kind: NudgeKind) -> Self {
        Self(format!("{}_{}", kind.as_str(), Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NudgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeKind {
    Complement,
    MultiBuy,
    /// Reserved; no generator produces it yet.
    Substitute,
    /// Reserved; no generator produces it yet.
    TradeUp,
    Mission,
}

impl NudgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complement => "complement",
            Self::MultiBuy => "multi_buy",
            Self::Substitute => "substitute",
            Self::TradeUp => "trade_up",
            Self::Mission => "mission",
        }
    }
}

/// What a generator proposes; the engine stamps identity and trigger onto it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NudgeProposal {
    pub kind: NudgeKind,
    pub title: String,
    pub reason: String,
    pub candidates: Vec<Product>,
    pub savings_label: String,
}

/// A single suggestion shown to the shopper after a scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nudge {
    #[serde(rename = "nudge_id")]
    pub id: NudgeId,
    #[serde(rename = "type")]
    pub kind: NudgeKind,
    pub title: String,
    pub reason: String,
    pub candidates: Vec<Product>,
    #[serde(rename = "savings")]
    pub savings_label: String,
    pub trigger_product_id: ProductId,
    pub created_at: DateTime<Utc>,
}

impl Nudge {
    pub fn from_proposal(
        proposal: NudgeProposal,
        trigger_product_id: ProductId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NudgeId::generate(proposal.kind),
            kind: proposal.kind,
            title: proposal.title,
            reason: proposal.reason,
            candidates: proposal.candidates,
            savings_label: proposal.savings_label,
            trigger_product_id,
            created_at,
        }
    }

    pub fn primary_candidate(&self) -> Option<&Product> {
        self.candidates.first()
    }
}
