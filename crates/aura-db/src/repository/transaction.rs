//! # Transaction Repository
//!
//! Read side for settled transactions, plus the in-transaction insert
//! functions the settlement engine composes.
//!
//! Settled rows are immutable: there is no update or delete here by
//! design. Corrections are new compensating transactions.

use aura_core::{Transaction, TransactionItem};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{DbError, DbResult};

// =============================================================================
// In-Transaction Operations (transaction writer)
// =============================================================================

/// Inserts a settlement header inside the caller's transaction.
pub async fn insert_header(conn: &mut SqliteConnection, txn: &Transaction) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO transactions
            (id, store_id, customer_id, invoice_number,
             subtotal_cents, discount_cents, tax_cents, total_cents,
             payment_method, points_earned, points_redeemed,
             membership_discount_cents, staff_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        "#,
    )
    .bind(&txn.id)
    .bind(&txn.store_id)
    .bind(&txn.customer_id)
    .bind(&txn.invoice_number)
    .bind(txn.subtotal_cents)
    .bind(txn.discount_cents)
    .bind(txn.tax_cents)
    .bind(txn.total_cents)
    .bind(txn.payment_method)
    .bind(txn.points_earned)
    .bind(txn.points_redeemed)
    .bind(txn.membership_discount_cents)
    .bind(&txn.staff_id)
    .bind(txn.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Inserts the line-item rows for a header inside the caller's
/// transaction. Items commit with their header or not at all.
pub async fn insert_items(
    conn: &mut SqliteConnection,
    items: &[TransactionItem],
) -> DbResult<()> {
    for item in items {
        sqlx::query(
            r#"
            INSERT INTO transaction_items
                (id, transaction_id, item_type, item_id, name,
                 unit_price_cents, quantity, total_cents, is_custom_price, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&item.id)
        .bind(&item.transaction_id)
        .bind(item.item_type)
        .bind(&item.item_id)
        .bind(&item.name)
        .bind(item.unit_price_cents)
        .bind(item.quantity)
        .bind(item.total_cents)
        .bind(item.is_custom_price)
        .bind(item.created_at)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Repository (pool operations)
// =============================================================================

/// Repository for reading settled transactions.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Gets a settled transaction by its UUID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Transaction> {
        sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", id))
    }

    /// Looks a transaction up by its business identifier.
    pub async fn get_by_invoice(
        &self,
        store_id: &str,
        invoice_number: &str,
    ) -> DbResult<Transaction> {
        sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE store_id = ?1 AND invoice_number = ?2",
        )
        .bind(store_id)
        .bind(invoice_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Transaction", invoice_number))
    }

    /// Gets the line items of a settled transaction.
    pub async fn get_items(&self, transaction_id: &str) -> DbResult<Vec<TransactionItem>> {
        let items = sqlx::query_as::<_, TransactionItem>(
            "SELECT * FROM transaction_items WHERE transaction_id = ?1 ORDER BY created_at, id",
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Lists a store's most recent transactions (receipt history view).
    pub async fn list_recent(&self, store_id: &str, limit: i64) -> DbResult<Vec<Transaction>> {
        let txns = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE store_id = ?1
            ORDER BY created_at DESC, invoice_number DESC
            LIMIT ?2
            "#,
        )
        .bind(store_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(txns)
    }

    /// Lists a customer's transactions, newest first.
    pub async fn list_by_customer(&self, customer_id: &str) -> DbResult<Vec<Transaction>> {
        let txns = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE customer_id = ?1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(txns)
    }
}
