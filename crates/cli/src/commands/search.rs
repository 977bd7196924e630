use serde::Serialize;
use smartshop_core::config::LoadOptions;

use crate::commands::catalog::ProductRow;
use crate::commands::{load_context, CommandResult};

/// The scan screen only ever shows this many matches.
pub const MAX_RESULTS: usize = 5;

#[derive(Debug, Serialize)]
struct SearchResults {
    term: String,
    total_matches: usize,
    results: Vec<ProductRow>,
}

pub fn run(options: &LoadOptions, term: &str) -> CommandResult {
    let (_, catalog) = match load_context(options) {
        Ok(context) => context,
        Err(error) => return CommandResult::from_error("search", &error),
    };

    let matches = catalog.search(term);
    let results =
        matches.iter().take(MAX_RESULTS).map(|product| ProductRow::from(*product)).collect();

    CommandResult::report(
        "search",
        &SearchResults { term: term.to_owned(), total_matches: matches.len(), results },
    )
}
