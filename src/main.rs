use anyhow::Context;

use bundle_handoff_lib::bootstrap::{self, config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = bootstrap::resolve_app_paths().context("Failed to resolve application directories")?;

    bootstrap::tracing::init_tracing_subscriber(&paths.logs_dir)
        .context("Failed to initialize tracing")?;

    let config_path = config::resolve_config_path(&paths);
    let config = config::load_config(&config_path)?;

    bundle_handoff_lib::run_app(config, paths).await
}
