// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `frostgate doctor` command implementation.
//!
//! Runs diagnostic checks against the frostgate environment to identify
//! configuration gaps and Snowflake connectivity problems.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use frostgate_config::FrostgateConfig;
use frostgate_core::{FrostgateError, Warehouse};
use frostgate_snowflake::SnowflakeClient;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

/// Run the `frostgate doctor` command.
///
/// With `--plain`, disables colored output.
pub async fn run_doctor(config: &FrostgateConfig, plain: bool) -> Result<(), FrostgateError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let mut results = Vec::new();

    results.push(check_snowflake_settings(config));
    results.push(check_upload_dir(config).await);
    results.push(check_snowflake_connectivity(config).await);

    println!();
    println!("  frostgate doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in &results {
        let duration_ms = result.duration.as_millis();
        let line = match result.status {
            CheckStatus::Pass => {
                if use_color {
                    use colored::Colorize;
                    let symbol = "✓".green().to_string();
                    format!(
                        "    {symbol} {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                } else {
                    format!(
                        "    [OK]   {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Warn => {
                warn_count += 1;
                if use_color {
                    use colored::Colorize;
                    let symbol = "!".yellow().to_string();
                    format!(
                        "    {symbol} {:<20} {} ({duration_ms}ms)",
                        result.name,
                        result.message.yellow()
                    )
                } else {
                    format!(
                        "    [WARN] {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Fail => {
                fail_count += 1;
                if use_color {
                    use colored::Colorize;
                    let symbol = "✗".red().to_string();
                    format!(
                        "    {symbol} {:<20} {} ({duration_ms}ms)",
                        result.name,
                        result.message.red()
                    )
                } else {
                    format!(
                        "    [FAIL] {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
        };
        println!("{line}");
    }

    println!();
    println!(
        "  {} checks, {} warnings, {} failures",
        results.len(),
        warn_count,
        fail_count
    );
    println!();

    if fail_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Check that the settings a working deployment needs are present.
fn check_snowflake_settings(config: &FrostgateConfig) -> CheckResult {
    let start = Instant::now();
    let mut missing = Vec::new();
    if config.snowflake.account.is_none() {
        missing.push("snowflake.account");
    }
    if config.snowflake.user.is_none() {
        missing.push("snowflake.user");
    }
    if config.snowflake.database.is_none() {
        missing.push("snowflake.database");
    }
    if config.snowflake.schema.is_none() {
        missing.push("snowflake.schema");
    }

    let (status, message) = if missing.is_empty() {
        (CheckStatus::Pass, "all required settings present".to_string())
    } else {
        (CheckStatus::Fail, format!("missing: {}", missing.join(", ")))
    };
    CheckResult {
        name: "settings".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

/// Check that the upload directory exists or can be created.
async fn check_upload_dir(config: &FrostgateConfig) -> CheckResult {
    let start = Instant::now();
    let dir = &config.server.upload_dir;
    let (status, message) = match tokio::fs::create_dir_all(dir).await {
        Ok(()) => (CheckStatus::Pass, format!("{dir} is writable")),
        Err(e) => (CheckStatus::Fail, format!("cannot create {dir}: {e}")),
    };
    CheckResult {
        name: "upload dir".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

/// Connect to Snowflake and run the probe statement.
async fn check_snowflake_connectivity(config: &FrostgateConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match SnowflakeClient::connect(&config.snowflake).await {
        Ok(client) => match client.probe().await {
            Ok(()) => (CheckStatus::Pass, "connected, probe succeeded".to_string()),
            Err(e) => (CheckStatus::Fail, format!("probe failed: {e}")),
        },
        Err(FrostgateError::Config(msg)) => {
            // Missing credentials already reported by the settings check.
            (CheckStatus::Warn, format!("skipped: {msg}"))
        }
        Err(e) => (CheckStatus::Fail, format!("connect failed: {e}")),
    };
    CheckResult {
        name: "snowflake".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_check_lists_missing_keys() {
        let config = FrostgateConfig::default();
        let result = check_snowflake_settings(&config);
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("snowflake.account"));
        assert!(result.message.contains("snowflake.schema"));
    }

    #[test]
    fn settings_check_passes_when_complete() {
        let mut config = FrostgateConfig::default();
        config.snowflake.account = Some("myorg-myaccount".into());
        config.snowflake.user = Some("svc".into());
        config.snowflake.database = Some("SFE_DB".into());
        config.snowflake.schema = Some("DOCS".into());
        let result = check_snowflake_settings(&config);
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn upload_dir_check_creates_directory() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = FrostgateConfig::default();
        config.server.upload_dir = temp
            .path()
            .join("uploads")
            .to_string_lossy()
            .into_owned();
        let result = check_upload_dir(&config).await;
        assert_eq!(result.status, CheckStatus::Pass);
    }
}
