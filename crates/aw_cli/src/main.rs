mod cli;
mod commands;
mod logging;
mod ui;

use anyhow::Context;
use aw_client::App;
use aw_core::Credentials;
use aw_web::{ServerConfig, ServerState};
use clap::Parser;
use cli::{Cli, Commands};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let config = cli.client_config();

    match cli.command {
        Commands::Serve {
            addr,
            username,
            password,
            empty,
        } => {
            logging::init_logging(verbose);
            let base = if empty {
                ServerConfig::empty()
            } else {
                ServerConfig::default()
            };
            let config = ServerConfig {
                credentials: username.zip(password).map(|(u, p)| Credentials::new(u, p)),
                ..base
            };
            info!("🦀 Starting articles backend with {} articles", config.seed.len());
            aw_web::serve(addr, ServerState::new(config))
                .await
                .context("articles backend stopped")?;
        }
        Commands::Tui => {
            let config = config?;
            let log_path = config.token_path.with_file_name("aw.log");
            logging::init_file_logging(verbose, &log_path)
                .with_context(|| format!("cannot open log file {}", log_path.display()))?;
            let app = App::open(&config).await?;
            ui::run(app).await?;
        }
        command => {
            logging::init_logging(verbose);
            let config = config?;
            let mut app = App::open(&config).await?;
            commands::handle_command(command, &mut app).await?;
        }
    }

    Ok(())
}
