pub mod catalog;
pub mod config;
pub mod demo;
pub mod scan;
pub mod search;

use rust_decimal::Decimal;
use serde::Serialize;
use smartshop_core::config::{AppConfig, LoadOptions};
use smartshop_core::{load_catalog, ApplicationError, Catalog, Nudge, ShopSession};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

#[derive(Debug, Serialize)]
struct CommandReport<'a, T: Serialize> {
    command: &'a str,
    status: &'static str,
    #[serde(flatten)]
    body: &'a T,
}

impl CommandResult {
    /// Success envelope carrying a structured body alongside `command`/`status`.
    pub fn report<T: Serialize>(command: &str, body: &T) -> Self {
        let payload = CommandReport { command, status: "ok", body };
        Self { exit_code: 0, output: serialize_payload(&payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(&payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(command, error.error_class(), error.to_string(), error.exit_code())
    }
}

fn serialize_payload<T: Serialize>(payload: &T) -> String {
    serde_json::to_string(payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Config and catalog every command starts from.
pub(crate) fn load_context(
    options: &LoadOptions,
) -> Result<(AppConfig, Catalog), ApplicationError> {
    let config = AppConfig::load(options.clone())?;
    let catalog = load_catalog(&config)?;
    Ok((config, catalog))
}

#[derive(Debug, Serialize)]
pub(crate) struct BasketLine {
    product_id: String,
    name: String,
    quantity: u32,
    line_total: Decimal,
}

#[derive(Debug, Serialize)]
pub(crate) struct BasketSummary {
    items: Vec<BasketLine>,
    total_items: u32,
    total_price: Decimal,
    total_savings: Decimal,
}

impl BasketSummary {
    pub(crate) fn of(session: &ShopSession) -> Self {
        Self {
            items: session
                .basket()
                .iter()
                .map(|item| BasketLine {
                    product_id: item.product.id.to_string(),
                    name: item.product.name.clone(),
                    quantity: item.quantity,
                    line_total: item.line_total(),
                })
                .collect(),
            total_items: session.total_items(),
            total_price: session.total_price(),
            total_savings: session.total_savings(),
        }
    }
}

/// What happened on one scan.
#[derive(Debug, Serialize)]
pub(crate) struct ScanOutcome {
    product_id: String,
    scan_number: u32,
    nudge: Option<Nudge>,
    accepted: bool,
}

impl ScanOutcome {
    pub(crate) fn new(
        product_id: String,
        scan_number: u32,
        nudge: Option<Nudge>,
        accepted: bool,
    ) -> Self {
        Self { product_id, scan_number, nudge, accepted }
    }
}
