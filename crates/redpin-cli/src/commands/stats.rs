use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `redpin stats`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.service.store_stats().await?, flags.format)
}
