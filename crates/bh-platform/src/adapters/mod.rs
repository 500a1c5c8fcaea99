//! # Platform Adapters / 平台适配器
//!
//! Port implementations backed by the device shell and tokio channels.
//! 基于设备 shell 与 tokio 通道的端口实现。
//!
//! # Modules / 模块
//!
//! - `installer` - `pm install-*` session transport
//! - `registry` - `pm path` / `cmd package resolve-activity`
//! - `launcher` - `am start -W -n`
//! - `surface` - foreground surface over an `mpsc` channel
//! - `runtime` - process shutdown through a `CancellationToken`
//! - `permission` - statically configured install permission

pub mod installer;
pub mod launcher;
pub mod permission;
pub mod registry;
pub mod runtime;
pub mod surface;

#[cfg(test)]
pub(crate) mod test_support;

pub use installer::PmShellInstaller;
pub use launcher::AmActivityLauncher;
pub use permission::StaticInstallPermission;
pub use registry::PmPackageRegistry;
pub use runtime::TokenAppRuntime;
pub use surface::{ChannelSurface, SurfaceCommand};
