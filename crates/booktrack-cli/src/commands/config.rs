//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use booktrack_core::Config;

use crate::output::{Output, OutputFormat};

const VALID_KEYS: &str = "api_url, data_dir, log_file, request_timeout_secs, verify_delete";

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "api_url": config.api_url,
                    "data_dir": config.data_dir,
                    "log_file": config.log_file,
                    "request_timeout_secs": config.request_timeout_secs,
                    "verify_delete": config.verify_delete
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.api_url);
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  api_url:              {}", config.api_url);
            println!("  data_dir:             {}", config.data_dir.display());
            println!(
                "  log_file:             {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!(
                "  request_timeout_secs: {}",
                config
                    .request_timeout_secs
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!("  verify_delete:        {}", config.verify_delete);
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "api_url" => {
            if value.is_empty() {
                bail!("api_url cannot be empty");
            }
            config.api_url = value.to_string();
        }
        "data_dir" => {
            config.data_dir = value.into();
        }
        "log_file" => {
            config.log_file = if is_unset(value) {
                None
            } else {
                Some(value.into())
            };
        }
        "request_timeout_secs" => {
            config.request_timeout_secs = if is_unset(value) {
                None
            } else {
                let secs: u64 = value
                    .parse()
                    .context("Invalid value for request_timeout_secs. Use a whole number of seconds.")?;
                Some(secs).filter(|s| *s > 0)
            };
        }
        "verify_delete" => {
            config.verify_delete = value
                .parse()
                .context("Invalid value for verify_delete. Use 'true' or 'false'.")?;
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                VALID_KEYS
            );
        }
    }
    Ok(())
}

fn is_unset(value: &str) -> bool {
    value.is_empty() || value == "none"
}
