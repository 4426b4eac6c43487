//! # Invoice Sequencer
//!
//! Issues gap-minimal, per-store sequential invoice numbers of the form
//! `{prefix}-{seq:06}` (e.g. `AUR-000042`).
//!
//! ## How Uniqueness Holds Under Concurrency
//!
//! The counter bump is a single atomic upsert executed inside the
//! settlement transaction:
//!
//! ```sql
//! INSERT INTO invoice_counters (store_id, next_seq) VALUES (:store, 1)
//! ON CONFLICT(store_id) DO UPDATE SET next_seq = next_seq + 1
//! RETURNING next_seq
//! ```
//!
//! SQLite serializes write transactions, so two concurrent settlements
//! for the same store get distinct sequence values. The bump shares the
//! settlement transaction: an aborted settlement rolls its counter bump
//! back too, so the value is reissued rather than leaving a gap. The
//! `UNIQUE(store_id, invoice_number)` constraint on the transactions
//! table is the final backstop; the settlement engine retries the whole
//! attempt when it fires.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;

/// Width of the zero-padded sequence portion of an invoice number.
const INVOICE_SEQ_WIDTH: usize = 6;

/// Bumps the store's counter and returns the formatted invoice number.
/// Must run inside the settlement transaction so an aborted settlement
/// never publishes its number.
pub async fn next_invoice_number(
    conn: &mut SqliteConnection,
    store_id: &str,
    prefix: &str,
) -> DbResult<String> {
    let seq: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO invoice_counters (store_id, next_seq)
        VALUES (?1, 1)
        ON CONFLICT(store_id) DO UPDATE SET next_seq = next_seq + 1
        RETURNING next_seq
        "#,
    )
    .bind(store_id)
    .fetch_one(conn)
    .await?;

    let invoice_number = format_invoice_number(prefix, seq);
    debug!(store_id, %invoice_number, "Issued invoice number");
    Ok(invoice_number)
}

/// Formats a sequence value as an invoice number.
fn format_invoice_number(prefix: &str, seq: i64) -> String {
    format!("{prefix}-{seq:0width$}", width = INVOICE_SEQ_WIDTH)
}

// =============================================================================
// Unit Tests
// =============================================================================
