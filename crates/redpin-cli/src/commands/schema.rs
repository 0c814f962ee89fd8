use anyhow::Context;
use serde::Serialize;

use redpin_schema::SchemaRegistry;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SchemaListResponse {
    schemas: Vec<&'static str>,
}

/// Handle `redpin schema`. Needs no store.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    match &args.name {
        Some(name) => {
            let schema = registry.get(name).with_context(|| {
                format!(
                    "unknown schema '{name}' (available: {})",
                    registry.list().join(", ")
                )
            })?;
            output(schema, flags.format)
        }
        None => output(
            &SchemaListResponse {
                schemas: registry.list(),
            },
            flags.format,
        ),
    }
}
