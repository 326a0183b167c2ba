use anyhow::Result;
use clap::Parser;
use eweb::config::{self, Config, ServerMode};
use tracing_subscriber::EnvFilter;

/// Axum server with colorized access logging.
#[derive(Parser)]
#[command(name = "eweb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bind address, overrides `LISTEN`
    #[arg(short, long)]
    listen: Option<String>,

    /// Server mode, overrides `SERVER_MODE`
    #[arg(short, long)]
    mode: Option<ServerMode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = config::load_from_env()?;
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    config.validate()?;

    init_tracing(&config)?;

    config.print_summary();

    eweb::server::run(config).await
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.log_color);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}
