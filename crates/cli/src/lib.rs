pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use smartshop_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(
    name = "smartshop",
    about = "SmartShop scan-and-nudge CLI",
    long_about = "Browse the catalog, simulate scans through a shopping session, and inspect the nudges the engine suggests.",
    after_help = "Examples:\n  smartshop search pasta\n  smartshop scan prod_011 prod_012 --session basket.json\n  smartshop demo --scans 12 --accept"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a smartshop.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Catalog JSON file, overriding config and env")]
    catalog: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level, overriding config and env")]
    log_level: Option<String>,
    #[arg(long, global = true, help = "Scans between nudge opportunities")]
    scan_interval: Option<u32>,
    #[arg(long, global = true, help = "Most nudges shown in one session")]
    max_nudges: Option<u32>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List catalog categories, or the products in one category")]
    Catalog {
        #[arg(long, help = "Only list products in this category")]
        category: Option<String>,
    },
    #[command(about = "Search products by name, brand or category")]
    Search { term: String },
    #[command(about = "Scan products into a session and report any nudges")]
    Scan(commands::scan::ScanArgs),
    #[command(about = "Run a seeded random shopping trip")]
    Demo(commands::demo::DemoArgs),
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
}

impl Cli {
    /// Global flags become the highest-precedence config layer.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                catalog_path: self.catalog.clone(),
                log_level: self.log_level.clone(),
                scan_interval: self.scan_interval,
                max_nudges: self.max_nudges,
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    // A broken config is reported by the command itself.
    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Catalog { category } => commands::catalog::run(&options, category.as_deref()),
        Command::Search { term } => commands::search::run(&options, &term),
        Command::Scan(args) => commands::scan::run(&options, &args),
        Command::Demo(args) => commands::demo::run(&options, &args),
        Command::Config => commands::config::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_logging(config: &AppConfig) {
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let outcome = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if let Err(error) = outcome {
        eprintln!("logging already initialised: {error}");
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::Cli;

    #[test]
    fn global_flags_fill_config_overrides() {
        let cli = Cli::try_parse_from([
            "smartshop",
            "search",
            "pasta",
            "--catalog",
            "data/catalog.json",
            "--log-level",
            "debug",
            "--max-nudges",
            "2",
        ])
        .expect("flags should parse");

        let options = cli.load_options();
        assert_eq!(options.overrides.catalog_path, Some(PathBuf::from("data/catalog.json")));
        assert_eq!(options.overrides.log_level.as_deref(), Some("debug"));
        assert_eq!(options.overrides.max_nudges, Some(2));
        assert_eq!(options.overrides.scan_interval, None);
        assert!(!options.require_file, "no explicit config file was named");
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let cli = Cli::try_parse_from(["smartshop", "--config", "shop.toml", "config"])
            .expect("flags should parse");

        let options = cli.load_options();
        assert_eq!(options.config_path, Some(PathBuf::from("shop.toml")));
        assert!(options.require_file);
    }
}
