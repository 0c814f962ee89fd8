use clap::Subcommand;

/// Location entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum LocationCommands {
    /// Create a location with a locally minted id.
    Create {
        #[arg(long)]
        name: String,
        /// Coordinates as `x,y,z`.
        #[arg(long, value_parser = super::parse_coordinates, allow_hyphen_values = true)]
        at: Option<[f64; 3]>,
    },
    /// Import a location transport payload from a file, or `-` for stdin.
    Import { input: String },
    /// Print the transport payload of a stored location.
    Export { id: String },
    /// Get a location by ID.
    Get { id: String },
    /// List locations.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete a location no fingerprint references.
    Delete { id: String },
}

/// Fingerprint entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FingerprintCommands {
    /// Record a fingerprint at a stored location.
    Create {
        #[arg(long)]
        location: String,
        /// Reading as `SOURCE=SIGNAL`, repeatable.
        #[arg(long = "reading", required = true, value_parser = super::parse_reading, allow_hyphen_values = true)]
        readings: Vec<(String, i32)>,
        /// Capture time in Unix milliseconds (defaults to now).
        #[arg(long)]
        timestamp: Option<i64>,
    },
    /// Import a fingerprint transport payload from a file, or `-` for stdin.
    Import { input: String },
    /// Print the transport payload of a stored fingerprint.
    Export { id: String },
    /// Get a fingerprint by ID.
    Get { id: String },
    /// List fingerprints.
    List {
        /// Only fingerprints taken at this location.
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete a fingerprint and its measurement.
    Delete { id: String },
}
