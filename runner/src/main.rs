use anyhow::Result;
use clap::Parser;
use tracing::info;

use runner::{build_runner_app, load_config, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = load_config(&args.config)?;
    cfg.apply_args(&args);
    cfg.validate()?;
    info!(?cfg, "Runner config loaded");

    let mut app = build_runner_app(cfg)?;
    app.insert_resource(args);
    app.run();
    Ok(())
}
