use anyhow::{Context, Result};
use cellpaint::app::{self, RenderJob};
use cellpaint::cli::{Cli, Commands};
use clap::Parser;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI --log-level takes highest precedence, then DEBUG_LEVEL, then config (applied below).
    cellpaint::debug::init_log_bridge(cli.log_level.map(|l| l.to_level_filter()));

    let config = app::load_config(cli.config.as_deref())?;
    cellpaint::debug::apply_config_level(config.log_level);
    log::info!("Starting cellpaint {}", cellpaint::VERSION);

    match cli.command {
        Commands::Render(args) => {
            let job = RenderJob::from_args(&args, &config)?;
            // Atlas generation runs on the runtime's blocking pool
            let runtime = Runtime::new().context("starting tokio runtime")?;
            runtime.block_on(app::run(job, &config))
        }
        Commands::ShowConfig => {
            let yaml = serde_yaml_ng::to_string(&config).context("serializing config")?;
            print!("{yaml}");
            Ok(())
        }
    }
}
