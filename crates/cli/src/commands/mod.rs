pub mod config;
pub mod recommend;
pub mod search;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use shopmatch_core::{
    CatalogEntry, LoadOptions, RankingConfig, RankingEngine, UserProfile,
};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandFailure {
    command: String,
    status: String,
    error_class: String,
    message: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn failure(command: &str, error_class: &str, message: impl Into<String>, exit_code: u8) -> Self {
        let payload = CommandFailure {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: error_class.to_string(),
            message: message.into(),
        };
        let output = serde_json::to_string(&payload).unwrap_or_else(|error| {
            format!(
                "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        });
        Self { exit_code, output }
    }
}

/// Build the engine from the layered configuration (defaults, optional
/// file, `SHOPMATCH_*` env vars).
pub(crate) fn load_engine(config_path: Option<&Path>) -> Result<RankingEngine, CommandResult> {
    load_config(config_path).and_then(|config| {
        RankingEngine::new(config).map_err(|error| {
            CommandResult::failure("engine", "config_validation", error.to_string(), 2)
        })
    })
}

pub(crate) fn load_config(config_path: Option<&Path>) -> Result<RankingConfig, CommandResult> {
    RankingConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        ..LoadOptions::default()
    })
    .map_err(|error| CommandResult::failure("config", "config_validation", error.to_string(), 2))
}

pub(crate) fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read catalog file `{}`", path.display()))?;
    let entries: Vec<CatalogEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("could not parse catalog file `{}`", path.display()))?;
    tracing::debug!(entries = entries.len(), "loaded catalog snapshot");
    Ok(entries)
}

pub(crate) fn load_profile(path: &Path) -> Result<UserProfile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read profile file `{}`", path.display()))?;
    let profile: UserProfile = serde_json::from_str(&raw)
        .with_context(|| format!("could not parse profile file `{}`", path.display()))?;
    Ok(profile)
}

pub(crate) fn render_results(
    command: &str,
    results: Vec<shopmatch_core::RankedResult>,
    limit: Option<usize>,
) -> CommandResult {
    let mut results = results;
    if let Some(limit) = limit {
        results.truncate(limit);
    }
    match serde_json::to_string_pretty(&results) {
        Ok(json) => CommandResult::success(json),
        Err(error) => CommandResult::failure(command, "serialization", error.to_string(), 1),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const CATALOG_JSON: &str = r#"[
      {
        "id": "iphone-15-pro-max",
        "name": "Apple iPhone 15 Pro Max 256GB",
        "brand": "Apple",
        "category": "phones",
        "tags": ["camera", "flagship"],
        "specs": {
          "storage_gb": 256,
          "ram_gb": 8,
          "camera_mp": 48,
          "battery_mah": 4441,
          "screen_size_inch": 6.7,
          "refresh_rate_hz": 120
        },
        "offers": [
          {
            "price": 4999.0,
            "shipping_cost": 12.0,
            "rating_average": 4.7,
            "rating_count": 3500,
            "is_verified": true
          }
        ]
      }
    ]"#;

    const PROFILE_JSON: &str = r#"{
      "budget": { "min": 3000.0, "max": 5500.0 },
      "priority": "balanced",
      "use_case": "everyday"
    }"#;

    #[test]
    fn recommend_emits_a_json_array() {
        let dir = TempDir::new().expect("tempdir");
        let catalog = dir.path().join("catalog.json");
        let profile = dir.path().join("profile.json");
        fs::write(&catalog, CATALOG_JSON).expect("write catalog");
        fs::write(&profile, PROFILE_JSON).expect("write profile");

        let result = crate::commands::recommend::run(None, &catalog, &profile, None);
        assert_eq!(result.exit_code, 0);
        let parsed: Vec<serde_json::Value> =
            serde_json::from_str(&result.output).expect("output is a JSON array");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["entry_id"], "iphone-15-pro-max");
    }

    #[test]
    fn search_rejects_unknown_sort_key() {
        let dir = TempDir::new().expect("tempdir");
        let catalog = dir.path().join("catalog.json");
        let profile = dir.path().join("profile.json");
        fs::write(&catalog, CATALOG_JSON).expect("write catalog");
        fs::write(&profile, PROFILE_JSON).expect("write profile");

        let result =
            crate::commands::search::run(None, "iphone", &catalog, &profile, "newest", None);
        // A bad sort key is user input, not a config failure.
        assert_eq!(result.exit_code, 1);
        assert!(result.output.contains("input"));
        assert!(result.output.contains("unsupported sort key"));
    }

    #[test]
    fn missing_catalog_file_is_an_input_failure() {
        let dir = TempDir::new().expect("tempdir");
        let catalog = dir.path().join("absent.json");
        let profile = dir.path().join("profile.json");
        fs::write(&profile, PROFILE_JSON).expect("write profile");

        let result = crate::commands::recommend::run(None, &catalog, &profile, None);
        assert_eq!(result.exit_code, 1);
        assert!(result.output.contains("input"));
    }

    #[test]
    fn limit_truncates_results() {
        let results = Vec::new();
        let rendered = render_results("recommend", results, Some(0));
        assert_eq!(rendered.exit_code, 0);
        assert_eq!(rendered.output.trim(), "[]");
    }
}
