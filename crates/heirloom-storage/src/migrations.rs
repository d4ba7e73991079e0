// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled in with `embed_migrations!` and
//! applied every time a [`Database`](crate::Database) is opened.

use heirloom_core::HeirloomError;
use tracing::debug;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Runs all pending migrations against `conn`.
///
/// Refinery records applied versions in `refinery_schema_history`, so this is
/// safe to call on every open.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), HeirloomError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(HeirloomError::storage)?;
    for migration in report.applied_migrations() {
        debug!(version = migration.version(), name = %migration.name(), "applied migration");
    }
    Ok(())
}
