use serde::Serialize;

use redpin_core::entities::{Fingerprint, Reading};
use redpin_core::enums::MergeOutcome;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::FingerprintCommands;
use crate::commands::shared::input::read_json;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct FingerprintImportResponse {
    fingerprint: Fingerprint,
    outcome: MergeOutcome,
}

/// Flattened view for listings; the full reading set is left to `get`.
#[derive(Debug, Serialize)]
struct FingerprintSummary {
    id: String,
    location: String,
    measurement: String,
    timestamp: i64,
    readings: usize,
    revision: i64,
}

impl From<Fingerprint> for FingerprintSummary {
    fn from(fp: Fingerprint) -> Self {
        Self {
            id: fp.id,
            location: fp.location_id,
            timestamp: fp.measurement.timestamp.timestamp_millis(),
            readings: fp.measurement.readings.len(),
            measurement: fp.measurement.id,
            revision: fp.revision,
        }
    }
}

#[derive(Debug, Serialize)]
struct FingerprintListResponse {
    fingerprints: Vec<FingerprintSummary>,
}

#[derive(Debug, Serialize)]
struct DeletedResponse<'a> {
    deleted: &'a str,
}

fn capture_time(timestamp: Option<i64>) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    match timestamp {
        Some(ms) => chrono::DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| anyhow::anyhow!("timestamp {ms} is out of range")),
        None => Ok(chrono::Utc::now()),
    }
}

/// Handle `redpin fingerprint`.
pub async fn handle(
    action: &FingerprintCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        FingerprintCommands::Create {
            location,
            readings,
            timestamp,
        } => {
            let readings = readings
                .iter()
                .map(|(source, signal)| Reading::new(source.clone(), *signal))
                .collect();
            let fp = service
                .create_fingerprint(location, capture_time(*timestamp)?, readings)
                .await?;
            output(&fp, flags.format)
        }
        FingerprintCommands::Import { input } => {
            let payload = read_json(input)?;
            let imported = service.import_fingerprint(&payload).await?;
            output(
                &FingerprintImportResponse {
                    fingerprint: imported.entity,
                    outcome: imported.outcome,
                },
                flags.format,
            )
        }
        FingerprintCommands::Export { id } => {
            output(&service.export_fingerprint(id).await?, flags.format)
        }
        FingerprintCommands::Get { id } => output(&service.get_fingerprint(id).await?, flags.format),
        FingerprintCommands::List { location, limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            let mut fingerprints = match location {
                Some(location_id) => service.list_fingerprints_at_location(location_id).await?,
                None => service.list_fingerprints(limit).await?,
            };
            fingerprints.truncate(usize::try_from(limit)?);
            let fingerprints = fingerprints.into_iter().map(FingerprintSummary::from).collect();
            output(&FingerprintListResponse { fingerprints }, flags.format)
        }
        FingerprintCommands::Delete { id } => {
            service.delete_fingerprint(id).await?;
            output(&DeletedResponse { deleted: id }, flags.format)
        }
    }
}
