//! `blobmirror SOURCE DEST`: upload changed files, optionally delete stale ones.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use blobmirror_core::config::{connection_string_from, DEFAULT_CONTAINER};
use blobmirror_core::SyncConfig;
use blobmirror_sync::{run, AzureBlobStore, SyncReport};

use crate::console::ConsoleReporter;

/// Arguments for a mirror run.
#[derive(Args, Debug)]
pub struct MirrorArgs {
    /// Source folder
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Blob storage destination
    #[arg(value_name = "DEST")]
    pub dest: String,

    /// Remove items from the destination that are not present in the source
    #[arg(long)]
    pub sync: bool,

    /// Blob storage container
    #[arg(long, default_value = DEFAULT_CONTAINER)]
    pub container: String,

    /// Show what would be uploaded or deleted without changing the container.
    #[arg(long)]
    pub dry_run: bool,
}

impl MirrorArgs {
    /// Combine the arguments with the credential read through `lookup`.
    pub fn into_config<F>(self, lookup: F) -> Result<SyncConfig>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let connection_string = connection_string_from(lookup)?;
        let mut config = SyncConfig::new(self.source, &self.dest, connection_string);
        config.container = self.container;
        config.sync = self.sync;
        config.dry_run = self.dry_run;
        config.validate()?;
        Ok(config)
    }

    pub fn run(self) -> Result<()> {
        let config = self.into_config(|var| std::env::var(var).ok())?;
        tracing::debug!("starting mirror: {config:?}");

        let store = AzureBlobStore::connect(&config.connection_string, &config.container)
            .with_context(|| format!("cannot open container '{}'", config.container))?;

        let stdout = io::stdout();
        let mut reporter = ConsoleReporter::new(stdout.lock(), config.dry_run);
        let report = run(&config, &store, &mut reporter).with_context(|| {
            format!(
                "mirror of {} to '{}' failed",
                config.source.display(),
                config.dest_prefix
            )
        })?;

        print_summary(&report, config.dry_run);
        Ok(())
    }
}

fn print_summary(report: &SyncReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    println!(
        "{prefix}✓ {} uploaded, {} skipped, {} deleted, {} failed",
        report.uploaded(),
        report.skipped(),
        report.deleted(),
        report.failed(),
    );
}
