use std::path::Path;

use crate::commands::{self, CommandResult};

/// Print the effective configuration after file and env layering.
pub fn run(config_path: Option<&Path>) -> CommandResult {
    let config = match commands::load_config(config_path) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    match toml::to_string_pretty(&config) {
        Ok(rendered) => CommandResult::success(rendered),
        Err(error) => CommandResult::failure("config", "serialization", error.to_string(), 1),
    }
}
