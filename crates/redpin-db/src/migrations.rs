//! Embedded schema migrations, applied in order every time the store opens.
//! Each file must be safe to re-run.

use crate::RedpinDb;
use crate::error::DatabaseError;

const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial",
    include_str!("../migrations/001_initial.sql"),
)];

impl RedpinDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            self.conn
                .execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            tracing::trace!(migration = *name, "applied");
        }
        Ok(())
    }
}
