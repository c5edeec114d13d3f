//! blobmirror: mirror a local directory into an Azure Blob Storage container.
//!
//! # Usage
//!
//! ```text
//! CONNECTION_STRING=... blobmirror [--sync] [--dry-run] [--container NAME] SOURCE DEST
//! ```
//!
//! Files whose stored MD5 matches the local content are skipped. With
//! `--sync`, objects under DEST that no longer exist locally are deleted.

mod commands;
mod console;

use anyhow::Result;
use clap::Parser;

use commands::mirror::MirrorArgs;

#[derive(Parser, Debug)]
#[command(
    name = "blobmirror",
    version,
    about = "Upload a directory tree to blob storage, skipping unchanged files",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    mirror: MirrorArgs,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    cli.mirror.run()
}
