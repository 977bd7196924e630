pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod nudges;
pub mod savings;
pub mod session;

pub use catalog::{Catalog, ComplementMap};
pub use domain::mission::Mission;
pub use domain::nudge::{Nudge, NudgeId, NudgeKind, NudgeProposal};
pub use domain::product::{Product, ProductId, Promotion, ValueBand};
pub use domain::profile::{BudgetBand, UserProfile};
pub use errors::{ApplicationError, CatalogError, DomainError, SessionError};
pub use nudges::{NudgeEngine, NudgeGenerator, ThrottlePolicy};
pub use savings::SavingsCalculator;
pub use session::{BasketItem, ShopSession};

use config::AppConfig;

/// Catalog named by the config, or the built-in demo dataset.
pub fn load_catalog(config: &AppConfig) -> Result<Catalog, CatalogError> {
    match &config.catalog.path {
        Some(path) => Catalog::load(path),
        None => Ok(Catalog::seeded()),
    }
}

/// Engine wired with the configured throttling policy and currency.
pub fn engine_for<'a>(catalog: &'a Catalog, config: &AppConfig) -> NudgeEngine<'a> {
    NudgeEngine::new(catalog)
        .with_policy(config.nudges.throttle_policy())
        .with_savings(config.catalog.savings_calculator())
}
