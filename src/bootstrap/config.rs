//! # Configuration Loader / 配置加载器
//!
//! Reads `HandoffConfig` from TOML. A missing file means defaults; a file
//! that exists but cannot be read or parsed is an error.
//! 读取 TOML 配置。文件缺失时使用默认值；无法读取或解析时报错。

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use bh_app::AppPaths;
use bh_core::HandoffConfig;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "BUNDLE_HANDOFF_CONFIG";

pub fn resolve_config_path(paths: &AppPaths) -> PathBuf {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => paths.config_path.clone(),
    }
}

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
pub fn load_config(config_path: &Path) -> anyhow::Result<HandoffConfig> {
    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %config_path.display(), "no config file, using defaults");
            return Ok(HandoffConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })
        }
    };

    HandoffConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}
