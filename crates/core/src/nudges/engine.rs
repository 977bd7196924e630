use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::domain::nudge::Nudge;
use crate::domain::product::Product;
use crate::savings::SavingsCalculator;

use super::generators::{ComplementGenerator, MissionGenerator, MultiBuyGenerator};
use super::{NudgeGenerator, ThrottlePolicy};

/// Decides, after each scan, whether and what to suggest.
///
/// Holds no state between calls: the session counters arrive as arguments and
/// the catalog is only read.
pub struct NudgeEngine<'a> {
    catalog: &'a Catalog,
    savings: SavingsCalculator,
    policy: ThrottlePolicy,
    generators: Vec<Box<dyn NudgeGenerator>>,
}

impl<'a> NudgeEngine<'a> {
    /// Engine with the standard priority order: complement, multi-buy, mission.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_generators(
            catalog,
            vec![
                Box::new(ComplementGenerator),
                Box::new(MultiBuyGenerator),
                Box::new(MissionGenerator),
            ],
        )
    }

    /// Generators are consulted in the order given.
    pub fn with_generators(catalog: &'a Catalog, generators: Vec<Box<dyn NudgeGenerator>>) -> Self {
        Self {
            catalog,
            savings: SavingsCalculator::default(),
            policy: ThrottlePolicy::default(),
            generators,
        }
    }

    pub fn with_policy(mut self, policy: ThrottlePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_savings(mut self, savings: SavingsCalculator) -> Self {
        self.savings = savings;
        self
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn policy(&self) -> ThrottlePolicy {
        self.policy
    }

    pub fn generate_nudge(
        &self,
        scanned: &Product,
        scan_count: u32,
        nudge_count: u32,
    ) -> Option<Nudge> {
        self.generate_nudge_at(scanned, scan_count, nudge_count, Utc::now())
    }

    pub fn generate_nudge_at(
        &self,
        scanned: &Product,
        scan_count: u32,
        nudge_count: u32,
        now: DateTime<Utc>,
    ) -> Option<Nudge> {
        if !self.policy.allows(scan_count, nudge_count) {
            debug!(
                event_name = "nudge.throttled",
                product_id = %scanned.id,
                scan_count,
                nudge_count,
                "nudge suppressed by throttling policy"
            );
            return None;
        }

        let proposal = self
            .generators
            .iter()
            .find_map(|generator| {
                let proposal = generator.propose(scanned, self.catalog, &self.savings);
                if proposal.is_none() {
                    trace!(
                        event_name = "nudge.generator_skipped",
                        product_id = %scanned.id,
                        generator = generator.kind().as_str(),
                        "generator had nothing to suggest"
                    );
                }
                proposal
            });

        let Some(proposal) = proposal else {
            debug!(
                event_name = "nudge.no_match",
                product_id = %scanned.id,
                scan_count,
                "no generator produced a nudge"
            );
            return None;
        };

        let nudge = Nudge::from_proposal(proposal, scanned.id.clone(), now);
        debug!(
            event_name = "nudge.generated",
            product_id = %scanned.id,
            nudge_id = %nudge.id,
            kind = nudge.kind.as_str(),
            scan_count,
            nudge_count,
            "nudge generated"
        );
        Some(nudge)
    }
}
