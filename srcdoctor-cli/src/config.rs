//! Configuration file loading for srcdoctor.
//!
//! Discovers and loads `srcdoctor.toml` from the repository root, then merges
//! it over the built-in defaults. CLI flags take precedence over the file.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use srcdoctor_core::DoctorSettings;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "srcdoctor.toml";

/// Top-level configuration from srcdoctor.toml. Every field is optional;
/// anything absent falls back to the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DoctorConfig {
    pub repair: RepairConfig,
    pub compile: CompileConfig,
    pub watch: WatchConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Java source tree, relative to the repository root.
    pub src_dir: Option<Utf8PathBuf>,

    /// Minimum confidence for unattended application.
    pub confidence_threshold: Option<f64>,

    /// Bound on compile-fix-recompile rounds.
    pub max_iterations: Option<usize>,

    /// Treat compiler warnings as repair candidates.
    pub include_warnings: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Per-invocation compiler budget, seconds.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet period before reacting to a burst of save events, ms.
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// How many recent ledger entries to show.
    pub limit: Option<usize>,
}

/// Discover the srcdoctor.toml config file in the repository root.
pub fn discover_config(repo_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = repo_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<DoctorConfig> {
    let config: DoctorConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from repo root, or return default if not found.
pub fn load_or_default(repo_root: &Utf8Path) -> anyhow::Result<DoctorConfig> {
    match discover_config(repo_root) {
        Some(path) => {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read config file {path}"))?;
            parse_config(&contents).with_context(|| format!("parse config file {path}"))
        }
        None => Ok(DoctorConfig::default()),
    }
}

/// CLI flag values that may override the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub src_dir: Option<Utf8PathBuf>,
    pub confidence_threshold: Option<f64>,
    pub max_iterations: Option<usize>,
    pub include_warnings: bool,
    pub timeout_secs: Option<u64>,
    pub debounce_ms: Option<u64>,
    pub report_limit: Option<usize>,
}

/// Defaults, overlaid by the config file, overlaid by CLI flags.
pub fn build_settings(
    repo_root: Utf8PathBuf,
    config: DoctorConfig,
    cli: CliOverrides,
) -> DoctorSettings {
    let mut settings = DoctorSettings::for_repo(repo_root);

    if let Some(dir) = cli.src_dir.or(config.repair.src_dir) {
        settings.src_dir = if dir.is_absolute() {
            dir
        } else {
            settings.repo_root.join(dir)
        };
    }
    if let Some(t) = cli.confidence_threshold.or(config.repair.confidence_threshold) {
        settings.confidence_threshold = t;
    }
    if let Some(n) = cli.max_iterations.or(config.repair.max_iterations) {
        settings.max_iterations = n;
    }
    if cli.include_warnings || config.repair.include_warnings.unwrap_or(false) {
        settings.include_warnings = true;
    }
    if let Some(s) = cli.timeout_secs.or(config.compile.timeout_secs) {
        settings.compile_timeout_secs = s;
    }
    if let Some(ms) = cli.debounce_ms.or(config.watch.debounce_ms) {
        settings.debounce_ms = ms;
    }
    if let Some(n) = cli.report_limit.or(config.report.limit) {
        settings.report_limit = n;
    }
    settings
}
