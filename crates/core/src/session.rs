//! Single-shopper session: basket, scan and nudge counters, and the nudge
//! currently on screen.
//!
//! The engine never touches this state; [`ShopSession::scan`] reads the
//! counters, hands them to the engine, and records the outcome.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::nudge::{Nudge, NudgeId};
use crate::domain::product::{Product, ProductId};
use crate::domain::profile::UserProfile;
use crate::errors::{DomainError, SessionError};
use crate::nudges::NudgeEngine;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketItem {
    pub product: Product,
    pub quantity: u32,
}

impl BasketItem {
    /// Saturates at `Decimal::MAX` rather than overflowing.
    pub fn line_total(&self) -> Decimal {
        self.product.effective_price().saturating_mul(Decimal::from(self.quantity))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSession {
    basket: Vec<BasketItem>,
    scan_count: u32,
    nudge_count: u32,
    current_nudge: Option<Nudge>,
    /// Write-only record of nudges the shopper has seen off.
    dismissed_nudges: Vec<NudgeId>,
    #[serde(default)]
    profile: UserProfile,
}

impl ShopSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn basket(&self) -> &[BasketItem] {
        &self.basket
    }

    pub fn scan_count(&self) -> u32 {
        self.scan_count
    }

    pub fn nudge_count(&self) -> u32 {
        self.nudge_count
    }

    pub fn current_nudge(&self) -> Option<&Nudge> {
        self.current_nudge.as_ref()
    }

    pub fn dismissed_nudges(&self) -> &[NudgeId] {
        &self.dismissed_nudges
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = profile;
    }

    pub fn add_to_basket(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        match self.basket.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.basket.push(BasketItem { product: product.clone(), quantity }),
        }
    }

    pub fn remove_from_basket(&mut self, product_id: &ProductId) {
        self.basket.retain(|item| &item.product.id != product_id);
    }

    /// Zero removes the line; an id not in the basket is ignored.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_from_basket(product_id);
            return;
        }

        if let Some(item) = self.basket.iter_mut().find(|item| &item.product.id == product_id) {
            item.quantity = quantity;
        }
    }

    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.basket
            .iter()
            .find(|item| &item.product.id == product_id)
            .map_or(0, |item| item.quantity)
    }

    pub fn total_items(&self) -> u32 {
        self.basket.iter().map(|item| item.quantity).sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.basket.iter().map(BasketItem::line_total).fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Loyalty savings only; multi-buy deals are not priced into the basket.
    pub fn total_savings(&self) -> Decimal {
        self.basket
            .iter()
            .filter_map(|item| {
                item.product
                    .loyalty_saving()
                    .map(|saving| saving.saturating_mul(Decimal::from(item.quantity)))
            })
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Records one scan of `product` and shows whatever nudge the engine returns.
    ///
    /// The engine sees the counters as they were before this scan.
    pub fn scan(
        &mut self,
        engine: &NudgeEngine<'_>,
        product: &Product,
        now: DateTime<Utc>,
    ) -> Option<&Nudge> {
        let scans_before = self.scan_count;
        self.add_to_basket(product, 1);
        self.scan_count = self.scan_count.saturating_add(1);

        debug!(
            event_name = "session.scan",
            product_id = %product.id,
            scan_count = self.scan_count,
            "product scanned into basket"
        );

        let nudge = engine.generate_nudge_at(product, scans_before, self.nudge_count, now)?;
        self.show_nudge(nudge);
        self.current_nudge.as_ref()
    }

    /// Puts a nudge on screen, replacing any nudge already displayed.
    pub fn show_nudge(&mut self, nudge: Nudge) {
        self.nudge_count = self.nudge_count.saturating_add(1);
        info!(
            event_name = "session.nudge_shown",
            nudge_id = %nudge.id,
            kind = nudge.kind.as_str(),
            nudge_count = self.nudge_count,
            "nudge displayed"
        );
        self.current_nudge = Some(nudge);
    }

    /// Adds every candidate to the basket, then dismisses the nudge.
    pub fn accept_nudge(&mut self) -> Result<Nudge, DomainError> {
        let nudge = self.current_nudge.clone().ok_or(DomainError::NoActiveNudge)?;
        for candidate in &nudge.candidates {
            self.add_to_basket(candidate, 1);
        }

        info!(
            event_name = "session.nudge_accepted",
            nudge_id = %nudge.id,
            candidates = nudge.candidates.len(),
            "nudge accepted"
        );
        self.dismiss_nudge()
    }

    pub fn dismiss_nudge(&mut self) -> Result<Nudge, DomainError> {
        let nudge = self.current_nudge.take().ok_or(DomainError::NoActiveNudge)?;
        self.dismissed_nudges.push(nudge.id.clone());
        debug!(event_name = "session.nudge_dismissed", nudge_id = %nudge.id, "nudge dismissed");
        Ok(nudge)
    }

    /// Auto-dismisses the displayed nudge once `timeout` has elapsed.
    pub fn expire_nudge(&mut self, now: DateTime<Utc>, timeout: Duration) -> Option<Nudge> {
        let shown_at = self.current_nudge.as_ref()?.created_at;
        if now - shown_at < timeout {
            return None;
        }
        self.dismiss_nudge().ok()
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Missing file starts a fresh session.
    pub fn load_or_default(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .map_err(|source| SessionError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_json(&raw)
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let raw = self.to_json()?;
        fs::write(path, raw)
            .map_err(|source| SessionError::WriteFile { path: path.to_path_buf(), source })
    }
}
