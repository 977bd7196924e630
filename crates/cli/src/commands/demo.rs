use chrono::Utc;
use clap::Args;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use smartshop_core::config::LoadOptions;
use smartshop_core::{engine_for, ApplicationError, DomainError, ShopSession};

use crate::commands::{load_context, BasketSummary, CommandResult, ScanOutcome};

#[derive(Debug, Clone, Args)]
pub struct DemoArgs {
    #[arg(long, default_value_t = 12, help = "Number of random scans")]
    pub scans: u32,
    #[arg(long, default_value_t = 42, help = "Seed for the product picker")]
    pub seed: u64,
    #[arg(long, help = "Accept every nudge as soon as it is shown")]
    pub accept: bool,
}

#[derive(Debug, Serialize)]
struct DemoReport {
    seed: u64,
    scans: Vec<ScanOutcome>,
    nudges_shown: u32,
    nudges_accepted: usize,
    basket: BasketSummary,
}

pub fn run(options: &LoadOptions, args: &DemoArgs) -> CommandResult {
    match execute(options, args) {
        Ok(report) => CommandResult::report("demo", &report),
        Err(error) => CommandResult::from_error("demo", &error),
    }
}

fn execute(options: &LoadOptions, args: &DemoArgs) -> Result<DemoReport, ApplicationError> {
    let (config, catalog) = load_context(options)?;
    if catalog.is_empty() {
        return Err(DomainError::InvariantViolation(
            "demo needs at least one product in the catalog".to_owned(),
        )
        .into());
    }

    let engine = engine_for(&catalog, &config);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut session = ShopSession::new();
    let mut scans = Vec::new();

    for _ in 0..args.scans {
        let Some(product) = catalog.products().choose(&mut rng) else {
            break;
        };
        let nudge = session.scan(&engine, product, Utc::now()).cloned();
        let accepted = nudge.is_some() && args.accept;
        if accepted {
            session.accept_nudge()?;
        } else if nudge.is_some() {
            session.dismiss_nudge()?;
        }
        scans.push(ScanOutcome::new(product.id.to_string(), session.scan_count(), nudge, accepted));
    }

    let nudges_accepted = scans.iter().filter(|scan| scan.accepted).count();
    Ok(DemoReport {
        seed: args.seed,
        nudges_shown: session.nudge_count(),
        nudges_accepted,
        scans,
        basket: BasketSummary::of(&session),
    })
}
