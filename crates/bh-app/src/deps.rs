//! # Handoff Dependencies / 交付流程依赖
//!
//! Dependency grouping for `HandoffOrchestrator` construction.
//! 此模块定义编排器构造的依赖分组。
//!
//! **Note / 注意**: This is NOT a Builder pattern.
//! - No build steps / 无构建步骤
//! - No default values / 无默认值
//! - Just parameter grouping / 仅用于参数打包

use std::sync::Arc;

use bh_core::ports::*;

/// All ports the handoff flow needs. Every field is required.
/// 交付流程所需的全部端口，均为必需。
pub struct HandoffDeps {
    // Foreground / 前台
    pub surface: Arc<dyn ForegroundSurfacePort>,
    pub install_permission: Arc<dyn InstallPermissionPort>,

    // Staging / 暂存
    pub bundle_storage: Arc<dyn BundleStoragePort>,
    pub package_archive: Arc<dyn PackageArchivePort>,
    pub identity_cache: Arc<dyn IdentityCachePort>,

    // Installation / 安装
    pub installer: Arc<dyn InstallerServicePort>,

    // Launch / 启动
    pub package_registry: Arc<dyn PackageRegistryPort>,
    pub activity_launcher: Arc<dyn ActivityLauncherPort>,
    pub command_runner: Arc<dyn CommandRunnerPort>,

    // Lifecycle / 生命周期
    pub app_runtime: Arc<dyn AppRuntimePort>,
}
