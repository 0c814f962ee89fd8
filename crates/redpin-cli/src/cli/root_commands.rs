use clap::{Args, Subcommand};

use crate::cli::subcommands::{FingerprintCommands, LocationCommands};

/// Commands of the `redpin` binary.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create, sync and inspect shared locations.
    Location {
        #[command(subcommand)]
        action: LocationCommands,
    },
    /// Collect, sync and inspect fingerprints with their measurements.
    Fingerprint {
        #[command(subcommand)]
        action: FingerprintCommands,
    },
    /// Import a JSON array of fingerprint payloads, one transaction each.
    ImportBatch(ImportBatchArgs),
    /// Print the JSON Schema of a transport payload or trail record.
    Schema(SchemaArgs),
    /// Show committed mutations from the JSONL trail, oldest first.
    Trail(TrailArgs),
    /// Count stored locations, fingerprints and measurements.
    Stats,
}

#[derive(Clone, Debug, Args)]
pub struct ImportBatchArgs {
    /// File holding a JSON array, or `-` for stdin.
    pub input: String,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Registered name such as `fingerprint`; omit to list names.
    pub name: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct TrailArgs {
    /// Keep only the newest N operations.
    #[arg(long)]
    pub limit: Option<u32>,
}
