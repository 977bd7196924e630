use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use serde::Serialize;
use smartshop_core::config::LoadOptions;
use smartshop_core::{
    engine_for, ApplicationError, DomainError, Product, ProductId, ShopSession,
};
use tracing::info;

use crate::commands::{load_context, BasketSummary, CommandResult, ScanOutcome};

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    #[arg(required = true, help = "Product ids to scan, in order")]
    pub product_ids: Vec<String>,
    #[arg(long, help = "Session snapshot to resume from and save back to")]
    pub session: Option<PathBuf>,
    #[arg(long, help = "Accept every nudge as soon as it is shown")]
    pub accept: bool,
}

#[derive(Debug, Serialize)]
struct ScanReport {
    scans: Vec<ScanOutcome>,
    scan_count: u32,
    nudge_count: u32,
    basket: BasketSummary,
}

pub fn run(options: &LoadOptions, args: &ScanArgs) -> CommandResult {
    match execute(options, args) {
        Ok(report) => CommandResult::report("scan", &report),
        Err(error) => CommandResult::from_error("scan", &error),
    }
}

fn execute(options: &LoadOptions, args: &ScanArgs) -> Result<ScanReport, ApplicationError> {
    let (config, catalog) = load_context(options)?;

    let products = args
        .product_ids
        .iter()
        .map(|raw| {
            let id = ProductId::new(raw.trim());
            catalog.find(&id).cloned().ok_or(DomainError::UnknownProduct(id))
        })
        .collect::<Result<Vec<Product>, DomainError>>()?;

    let mut session = match &args.session {
        Some(path) => ShopSession::load_or_default(path)?,
        None => ShopSession::new(),
    };

    let now = Utc::now();
    if let Some(expired) = session.expire_nudge(now, config.nudges.display_timeout()) {
        info!(
            event_name = "cli.scan.nudge_expired",
            nudge_id = %expired.id,
            "stale nudge from previous run dismissed"
        );
    }

    let engine = engine_for(&catalog, &config);
    let mut scans = Vec::with_capacity(products.len());
    for product in &products {
        let nudge = session.scan(&engine, product, now).cloned();
        let accepted = nudge.is_some() && args.accept;
        if accepted {
            session.accept_nudge()?;
        }
        scans.push(ScanOutcome::new(product.id.to_string(), session.scan_count(), nudge, accepted));
    }

    if let Some(path) = &args.session {
        session.save(path)?;
    }

    Ok(ScanReport {
        scans,
        scan_count: session.scan_count(),
        nudge_count: session.nudge_count(),
        basket: BasketSummary::of(&session),
    })
}
