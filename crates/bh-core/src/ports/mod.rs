//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases in `bh-app` and the
//! adapters in `bh-infra` / `bh-platform`. Core logic stays independent of
//! the filesystem, subprocesses and the foreground surface.
//!
//! ## Port Placement Guidelines
//!
//! Before adding a new port here, ask:
//!
//! 1. **Does this port represent a capability the handoff flow needs?**
//! 2. **Will it be depended upon by more than one use case?**
//! 3. **Is it implemented by the infrastructure or platform layer?**
//!
//! If all three answers are **yes**, place it in `bh-core/ports`.

pub mod activity_launcher;
pub mod app_dirs;
pub mod app_runtime;
pub mod bundle_storage;
pub mod command_runner;
pub mod errors;
pub mod identity_cache;
pub mod install_permission;
pub mod installer_service;
pub mod package_archive;
pub mod package_registry;
pub mod surface;

pub use activity_launcher::ActivityLauncherPort;
pub use app_dirs::AppDirsPort;
pub use app_runtime::AppRuntimePort;
pub use bundle_storage::{BundleReader, BundleStoragePort};
pub use command_runner::{CommandOutput, CommandRunnerPort, CommandSpec};
pub use errors::{
    AppDirsError, BundleError, CommandError, IdentityCacheError, InstallerServiceError,
    LaunchError, ManifestError,
};
pub use identity_cache::IdentityCachePort;
pub use install_permission::InstallPermissionPort;
pub use installer_service::InstallerServicePort;
pub use package_archive::PackageArchivePort;
pub use package_registry::PackageRegistryPort;
pub use surface::ForegroundSurfacePort;
