//! # Configuration DTO / 配置数据结构
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! Defaults live in `defaults.rs`; every section may be omitted from the file.
//! 默认值位于 `defaults.rs`；配置文件中的每个段落都可以省略。

mod defaults;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use defaults::{DEFAULT_ARTIFACT_NAME, DEFAULT_SHELL_TIMEOUT_SECS};

/// Top-level configuration.
/// 顶层配置。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffConfig {
    pub bundle: BundleSection,
    pub install: InstallSection,
    pub launch: LaunchSection,
    pub shell: ShellSection,
    pub paths: PathsSection,
}

/// Where the bundled artifact lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleSection {
    /// Read-only bundle directory. Relative paths resolve against the
    /// current directory; empty means `<app data>/bundle`.
    pub root: PathBuf,
    /// Logical name of the artifact inside the bundle.
    pub artifact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallSection {
    /// Correlation action attached to committed sessions.
    pub completion_action: String,
    /// Platform level used to gate session hints; queried when absent.
    pub platform_level: Option<u32>,
    /// Upper bound on the wait for a completion event. `0` waits forever.
    pub completion_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSection {
    pub settle_delay_ms: u64,
    pub inter_attempt_delay_ms: u64,
    pub termination_grace_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSection {
    /// Program and arguments prepended to every platform command,
    /// e.g. `["adb", "shell"]` when driving a device from a host.
    pub prefix: Vec<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Overrides the scratch directory used for staging.
    pub scratch_dir: Option<PathBuf>,
}

impl HandoffConfig {
    /// Parse configuration from TOML text.
    /// 从 TOML 文本解析配置。
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn completion_timeout(&self) -> Option<Duration> {
        match self.install.completion_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl LaunchSection {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn inter_attempt_delay(&self) -> Duration {
        Duration::from_millis(self.inter_attempt_delay_ms)
    }

    pub fn termination_grace(&self) -> Duration {
        Duration::from_millis(self.termination_grace_ms)
    }
}

impl ShellSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
