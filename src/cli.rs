// CLI module for handling command-line interface

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ak")]
#[command(about = "Versioned asset and image cache for game companion clients")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the asset collection, downloading it when the remote version changed
    Load {
        /// Download even if the stored collection is current
        #[arg(long)]
        force: bool,
    },
    /// Show what is stored locally
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Download every image referenced by the stored collection
    Prefetch {
        /// Number of concurrent downloads
        #[arg(long, short)]
        jobs: Option<usize>,
    },
    /// Fetch a single image into the cache
    Image { url: String },
    /// Delete all cached images
    Clear {
        /// Also forget the stored asset collection
        #[arg(long)]
        assets: bool,
    },
    /// Fetch the remote version and validate images against it
    Version,
}
