//! # Store Repository
//!
//! Stores are the tenancy root: every catalog row, customer and settled
//! transaction belongs to exactly one store, and each store carries its
//! own settlement configuration (invoice prefix, tax rate).

use aura_core::Store;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for store operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Creates a new store and returns it.
    pub async fn create(
        &self,
        name: &str,
        invoice_prefix: &str,
        tax_rate_bps: u32,
    ) -> DbResult<Store> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(store_id = %id, name, "Creating store");

        sqlx::query(
            r#"
            INSERT INTO stores (id, name, invoice_prefix, tax_rate_bps, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(invoice_prefix)
        .bind(tax_rate_bps)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id).await
    }

    /// Gets a store by its UUID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Store> {
        sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Store", id))
    }

    /// Lists all stores.
    pub async fn list(&self) -> DbResult<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>("SELECT * FROM stores ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(stores)
    }

    /// Updates a store's settlement configuration.
    pub async fn update_config(
        &self,
        id: &str,
        invoice_prefix: &str,
        tax_rate_bps: u32,
    ) -> DbResult<Store> {
        let result = sqlx::query(
            r#"
            UPDATE stores
            SET invoice_prefix = ?2, tax_rate_bps = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(invoice_prefix)
        .bind(tax_rate_bps)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }

        self.get_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_store() {
        let db = test_db().await;
        let repo = db.stores();

        let store = repo.create("Aura Salon Indiranagar", "IND", 1800).await.unwrap();
        assert_eq!(store.name, "Aura Salon Indiranagar");
        assert_eq!(store.invoice_prefix, "IND");
        assert_eq!(store.tax_rate_bps, 1800);

        let fetched = repo.get_by_id(&store.id).await.unwrap();
        assert_eq!(fetched.id, store.id);
    }

    #[tokio::test]
    async fn test_get_missing_store() {
        let db = test_db().await;
        let err = db.stores().get_by_id("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_config() {
        let db = test_db().await;
        let repo = db.stores();

        let store = repo.create("Aura Salon", "AUR", 1800).await.unwrap();
        let updated = repo.update_config(&store.id, "AURA", 500).await.unwrap();
        assert_eq!(updated.invoice_prefix, "AURA");
        assert_eq!(updated.tax_rate_bps, 500);
    }
}
