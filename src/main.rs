mod asset_manager;
mod assets;
mod cli;
mod client;
mod commands;
mod config;
mod constants;
mod defaults;
mod hash;
mod image_manager;
#[cfg(test)]
mod testing;
mod ui;
mod version;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Load { force } => commands::load::load(force).await.map(|_| 0),
        Commands::Status { json } => commands::status::status(json).map(|_| 0),
        Commands::Prefetch { jobs } => commands::prefetch::prefetch(jobs).await,
        Commands::Image { url } => commands::image::image(url).await,
        Commands::Clear { assets } => commands::clear::clear(assets).map(|_| 0),
        Commands::Version => commands::version::version().await.map(|_| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            ui::error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}
