use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands::{batch, fingerprint, location, schema, stats, trail};
use crate::context::AppContext;

/// Route a parsed command to its handler. Only `schema` runs without the store.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Location { action } => location::handle(&action, ctx, flags).await,
        Commands::Fingerprint { action } => fingerprint::handle(&action, ctx, flags).await,
        Commands::ImportBatch(args) => batch::handle(&args, ctx, flags).await,
        Commands::Trail(args) => trail::handle(&args, ctx, flags).await,
        Commands::Stats => stats::handle(ctx, flags).await,
        Commands::Schema(args) => schema::handle(&args, flags),
    }
}
