use std::path::Path;

use shopmatch_core::SortKey;

use crate::commands::{self, CommandResult};

pub fn run(
    config: Option<&Path>,
    query: &str,
    catalog: &Path,
    profile: &Path,
    sort_key: &str,
    limit: Option<usize>,
) -> CommandResult {
    let sort_key: SortKey = match sort_key.parse() {
        Ok(key) => key,
        Err(error) => {
            return CommandResult::failure("search", "input", format!("{error}"), 1);
        }
    };
    let engine = match commands::load_engine(config) {
        Ok(engine) => engine,
        Err(failure) => return failure,
    };
    let entries = match commands::load_catalog(catalog) {
        Ok(entries) => entries,
        Err(error) => return CommandResult::failure("search", "input", format!("{error:#}"), 1),
    };
    let prefs = match commands::load_profile(profile) {
        Ok(prefs) => prefs,
        Err(error) => return CommandResult::failure("search", "input", format!("{error:#}"), 1),
    };

    tracing::info!(entries = entries.len(), query, "searching catalog");
    commands::render_results("search", engine.search(query, &entries, &prefs, sort_key), limit)
}
