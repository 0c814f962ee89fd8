use serde::Serialize;

use redpin_core::trail::TrailOperation;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::TrailArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct TrailResponse {
    enabled: bool,
    operations: Vec<TrailOperation>,
}

/// Keep the newest `limit` operations of an oldest-first list.
fn most_recent(mut ops: Vec<TrailOperation>, limit: usize) -> Vec<TrailOperation> {
    if ops.len() > limit {
        ops.drain(..ops.len() - limit);
    }
    ops
}

/// Handle `redpin trail`.
pub async fn handle(args: &TrailArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let trail = ctx.service.trail();
    let limit = effective_limit(args.limit, flags.limit, ctx.config.general.default_limit);
    let operations = most_recent(trail.read_all()?, usize::try_from(limit)?);
    output(
        &TrailResponse {
            enabled: trail.is_enabled(),
            operations,
        },
        flags.format,
    )
}
