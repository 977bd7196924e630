//! Contextual nudge suggestions shown after a product scan.
//!
//! Three independent generators each inspect the scanned product against the
//! catalog; the engine applies throttling and asks them in a fixed priority
//! order, returning the first proposal.

mod engine;
mod generators;

pub use engine::NudgeEngine;
pub use generators::{ComplementGenerator, MissionGenerator, MultiBuyGenerator};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::domain::nudge::{NudgeKind, NudgeProposal};
use crate::domain::product::Product;
use crate::savings::SavingsCalculator;

/// A nudge is only considered on every third scan.
pub const DEFAULT_SCAN_INTERVAL: u32 = 3;

/// Upper bound on nudges shown in one session.
pub const DEFAULT_MAX_NUDGES: u32 = 6;

/// Seconds a displayed nudge stays up before it is auto-dismissed.
pub const DEFAULT_DISPLAY_TIMEOUT_SECS: u64 = 6;

pub trait NudgeGenerator: Send + Sync {
    fn kind(&self) -> NudgeKind;

    fn propose(
        &self,
        scanned: &Product,
        catalog: &Catalog,
        savings: &SavingsCalculator,
    ) -> Option<NudgeProposal>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottlePolicy {
    pub scan_interval: u32,
    pub max_nudges: u32,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self { scan_interval: DEFAULT_SCAN_INTERVAL, max_nudges: DEFAULT_MAX_NUDGES }
    }
}

impl ThrottlePolicy {
    /// Counters are the values before the current scan is counted.
    pub fn allows(&self, scan_count: u32, nudge_count: u32) -> bool {
        scan_count.checked_rem(self.scan_interval) == Some(0) && nudge_count < self.max_nudges
    }
}
