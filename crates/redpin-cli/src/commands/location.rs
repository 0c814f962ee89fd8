use serde::Serialize;

use redpin_core::entities::{Coordinates, Location};
use redpin_core::enums::MergeOutcome;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LocationCommands;
use crate::commands::shared::input::read_json;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct LocationImportResponse {
    location: Location,
    outcome: MergeOutcome,
}

#[derive(Debug, Serialize)]
struct LocationListResponse {
    locations: Vec<Location>,
}

#[derive(Debug, Serialize)]
struct DeletedResponse<'a> {
    deleted: &'a str,
}

/// Handle `redpin location`.
pub async fn handle(
    action: &LocationCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        LocationCommands::Create { name, at } => {
            let coordinates = at.map(|[x, y, z]| Coordinates(x, y, z));
            let location = service.create_location(name, coordinates).await?;
            output(&location, flags.format)
        }
        LocationCommands::Import { input } => {
            let payload = read_json(input)?;
            let imported = service.import_location(&payload).await?;
            output(
                &LocationImportResponse {
                    location: imported.entity,
                    outcome: imported.outcome,
                },
                flags.format,
            )
        }
        LocationCommands::Export { id } => output(&service.export_location(id).await?, flags.format),
        LocationCommands::Get { id } => output(&service.get_location(id).await?, flags.format),
        LocationCommands::List { limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            let locations = service.list_locations(limit).await?;
            output(&LocationListResponse { locations }, flags.format)
        }
        LocationCommands::Delete { id } => {
            service.delete_location(id).await?;
            output(&DeletedResponse { deleted: id }, flags.format)
        }
    }
}
