use crate::catalog::Catalog;
use crate::domain::nudge::{NudgeKind, NudgeProposal};
use crate::domain::product::{Product, Promotion};
use crate::savings::SavingsCalculator;

use super::NudgeGenerator;

/// Suggests the first listed complement that exists in the catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComplementGenerator;

impl NudgeGenerator for ComplementGenerator {
    fn kind(&self) -> NudgeKind {
        NudgeKind::Complement
    }

    fn propose(
        &self,
        scanned: &Product,
        catalog: &Catalog,
        savings: &SavingsCalculator,
    ) -> Option<NudgeProposal> {
        let complement = catalog.first_listed(catalog.complements_of(&scanned.id))?;

        Some(NudgeProposal {
            kind: NudgeKind::Complement,
            title: "Perfect pairing!".to_owned(),
            reason: format!("{} goes great with {}", complement.name, scanned.name),
            savings_label: savings.label_for(complement),
            candidates: vec![complement.clone()],
        })
    }
}

/// Nudges towards completing the scanned product's multi-buy deal.
///
/// The candidate is the first other product in the same promotion group. A
/// product with no group siblings (or no group id) suggests itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct MultiBuyGenerator;

impl NudgeGenerator for MultiBuyGenerator {
    fn kind(&self) -> NudgeKind {
        NudgeKind::MultiBuy
    }

    fn propose(
        &self,
        scanned: &Product,
        catalog: &Catalog,
        savings: &SavingsCalculator,
    ) -> Option<NudgeProposal> {
        let Some(Promotion::MultiBuy { value, threshold, group_id }) = &scanned.promotion else {
            return None;
        };
        let threshold = threshold.unwrap_or(Promotion::DEFAULT_MULTI_BUY_THRESHOLD);

        let candidate = group_id
            .as_deref()
            .and_then(|group| catalog.promo_group_siblings(group, &scanned.id).next())
            .unwrap_or(scanned);

        Some(NudgeProposal {
            kind: NudgeKind::MultiBuy,
            title: "Complete the deal!".to_owned(),
            reason: format!("Add another for {value}"),
            savings_label: savings.multi_buy_estimate(scanned, threshold),
            candidates: vec![candidate.clone()],
        })
    }
}

/// Suggests a product from the first mission the scanned product triggers.
#[derive(Clone, Copy, Debug, Default)]
pub struct MissionGenerator;

impl NudgeGenerator for MissionGenerator {
    fn kind(&self) -> NudgeKind {
        NudgeKind::Mission
    }

    fn propose(
        &self,
        scanned: &Product,
        catalog: &Catalog,
        savings: &SavingsCalculator,
    ) -> Option<NudgeProposal> {
        let mission = catalog.mission_triggered_by(&scanned.id)?;
        let suggestion = catalog.first_in_catalog(&mission.suggestions)?;

        Some(NudgeProposal {
            kind: NudgeKind::Mission,
            title: mission.title.clone(),
            reason: format!("Complete your {}", mission.name.to_lowercase()),
            savings_label: savings.label_for(suggestion),
            candidates: vec![suggestion.clone()],
        })
    }
}
