use clap::ValueEnum;

/// How command results are written to stdout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON, transport payloads exactly as exported.
    Json,
    /// Aligned columns for location and fingerprint listings.
    Table,
    /// Compact single-line JSON, suitable for piping into `import`.
    Raw,
}

/// Flags every handler may consult once parsing is done.
///
/// `--quiet` and `--verbose` are consumed by tracing setup and do not
/// travel with the rest.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    /// `--limit`, overridden by a subcommand's own `--limit`.
    pub limit: Option<u32>,
    /// `--config`, replacing the discovered config files.
    pub config: Option<String>,
}
