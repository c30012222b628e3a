use std::path::Path;

use crate::commands::{self, CommandResult};

pub fn run(
    config: Option<&Path>,
    catalog: &Path,
    profile: &Path,
    limit: Option<usize>,
) -> CommandResult {
    let engine = match commands::load_engine(config) {
        Ok(engine) => engine,
        Err(failure) => return failure,
    };
    let entries = match commands::load_catalog(catalog) {
        Ok(entries) => entries,
        Err(error) => {
            return CommandResult::failure("recommend", "input", format!("{error:#}"), 1);
        }
    };
    let prefs = match commands::load_profile(profile) {
        Ok(prefs) => prefs,
        Err(error) => {
            return CommandResult::failure("recommend", "input", format!("{error:#}"), 1);
        }
    };

    tracing::info!(entries = entries.len(), "ranking catalog for recommendation");
    commands::render_results("recommend", engine.recommend(&entries, &prefs), limit)
}
