use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `redpin` binary.
#[derive(Debug, Parser)]
#[command(name = "redpin", version, about = "Redpin - indoor positioning fingerprint store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// How results are printed
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Row cap for list and trail commands
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Log errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log store and sync activity at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to load instead of the discovered ones
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

impl Cli {
    /// Flags handed to every command handler.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            config: self.config.clone(),
        }
    }
}

/// Parse `x,y,z` into a coordinate triple.
pub fn parse_coordinates(raw: &str) -> Result<[f64; 3], String> {
    let parts = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate in '{raw}': {e}"))?;
    <[f64; 3]>::try_from(parts)
        .map_err(|parts| format!("expected 3 coordinates, got {}", parts.len()))
}

/// Parse `SOURCE=SIGNAL` into a reading pair.
pub fn parse_reading(raw: &str) -> Result<(String, i32), String> {
    let (source, signal) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected SOURCE=SIGNAL, got '{raw}'"))?;
    if source.trim().is_empty() {
        return Err(format!("empty source in '{raw}'"));
    }
    let signal = signal
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid signal in '{raw}': {e}"))?;
    Ok((source.trim().to_string(), signal))
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::{FingerprintCommands, LocationCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat, parse_coordinates, parse_reading};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "redpin", "--format", "table", "--limit", "10", "--verbose", "stats",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Stats));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["redpin", "stats", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["redpin", "--format", "xml", "stats"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["redpin", "--config", "/tmp/redpin.toml", "stats"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.config.as_deref(), Some("/tmp/redpin.toml"));
    }

    #[test]
    fn location_create_parses_coordinates() {
        let cli = Cli::try_parse_from([
            "redpin", "location", "create", "--name", "Office", "--at", "1.5,-2,0",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Location {
                action: LocationCommands::Create { name, at },
            } => {
                assert_eq!(name, "Office");
                assert_eq!(at, Some([1.5, -2.0, 0.0]));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn fingerprint_create_collects_readings() {
        let cli = Cli::try_parse_from([
            "redpin",
            "fingerprint",
            "create",
            "--location",
            "loc-1",
            "--reading",
            "ap-1=-55",
            "--reading",
            "ap-2=-70",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Fingerprint {
                action: FingerprintCommands::Create { readings, .. },
            } => assert_eq!(
                readings,
                vec![("ap-1".to_string(), -55), ("ap-2".to_string(), -70)]
            ),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn fingerprint_create_requires_a_reading() {
        let parsed = Cli::try_parse_from(["redpin", "fingerprint", "create", "--location", "l"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn coordinate_parser_rejects_wrong_arity() {
        assert!(parse_coordinates("1,2").is_err());
        assert!(parse_coordinates("1,2,x").is_err());
        assert_eq!(parse_coordinates(" 1, 2, 3 ").unwrap(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn reading_parser_splits_on_last_equals() {
        assert_eq!(
            parse_reading("aa:bb=cc=-40").unwrap(),
            ("aa:bb=cc".to_string(), -40)
        );
        assert!(parse_reading("=-40").is_err());
        assert!(parse_reading("ap").is_err());
        assert!(parse_reading("ap=loud").is_err());
    }
}
