use serde::Serialize;

use redpin_db::sync::BatchItemOutcome;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportBatchArgs;
use crate::commands::shared::input::read_json_array;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct BatchResponse {
    total: usize,
    imported: usize,
    retriable: usize,
    items: Vec<BatchItemOutcome>,
}

impl BatchResponse {
    fn new(items: Vec<BatchItemOutcome>) -> Self {
        Self {
            total: items.len(),
            imported: items
                .iter()
                .filter(|item| matches!(item, BatchItemOutcome::Imported { .. }))
                .count(),
            retriable: items.iter().filter(|item| item.is_retriable()).count(),
            items,
        }
    }
}

/// Handle `redpin import-batch`.
pub async fn handle(
    args: &ImportBatchArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let payloads = read_json_array(&args.input)?;
    let items = ctx.service.import_batch(&payloads).await;
    output(&BatchResponse::new(items), flags.format)
}

#[cfg(test)]
mod tests {
    use redpin_core::enums::{EntityKind, MergeOutcome};

    use super::*;

    #[test]
    fn response_counts_outcomes() {
        let response = BatchResponse::new(vec![
            BatchItemOutcome::Imported {
                id: "fp1".into(),
                outcome: MergeOutcome::Created,
            },
            BatchItemOutcome::Deferred {
                kind: EntityKind::Location,
                id: "loc9".into(),
            },
            BatchItemOutcome::Rejected {
                reason: "bad".into(),
            },
        ]);
        assert_eq!(response.total, 3);
        assert_eq!(response.imported, 1);
        assert_eq!(response.retriable, 1);
    }
}
