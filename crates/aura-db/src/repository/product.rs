//! # Product Repository + Stock Adjuster
//!
//! Products own the `stock` counter. At settlement time the stock
//! adjuster decrements it with a guarded UPDATE:
//!
//! ```sql
//! UPDATE products SET stock = stock - :qty
//! WHERE id = :id AND stock >= :qty
//! ```
//!
//! The precondition lives in the WHERE clause, not in application code,
//! so two settlements racing for the last unit cannot both win:
//! `rows_affected == 0` tells the loser its read was stale. The
//! `CHECK (stock >= 0)` constraint in the schema is the backstop.

use aura_core::{Product, Service};
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

// =============================================================================
// In-Transaction Operations (stock adjuster)
// =============================================================================

/// Outcome of a stock CAS attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOutcome {
    /// Stock decremented.
    Adjusted,
    /// Precondition failed: on-hand stock below requested quantity
    /// (or the product row is gone).
    InsufficientStock,
}

/// Decrements a product's stock by `quantity` inside the caller's
/// transaction. Never drives stock negative.
pub async fn decrement_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> DbResult<StockOutcome> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2, updated_at = ?3
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        debug!(product_id, quantity, "Stock CAS precondition failed");
        return Ok(StockOutcome::InsufficientStock);
    }

    Ok(StockOutcome::Adjusted)
}

/// Reads a product's current stock inside the caller's transaction.
/// Used to build a precise error after a failed CAS.
pub async fn fetch_stock(conn: &mut SqliteConnection, product_id: &str) -> DbResult<Option<i64>> {
    let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
        .bind(product_id)
        .fetch_optional(conn)
        .await?;
    Ok(stock)
}

// =============================================================================
// Repository (pool operations)
// =============================================================================

/// Repository for product and service catalog operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a new retail product.
    pub async fn create(
        &self,
        store_id: &str,
        name: &str,
        price_cents: i64,
        stock: i64,
        min_stock: i64,
    ) -> DbResult<Product> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(product_id = %id, name, stock, "Creating product");

        sqlx::query(
            r#"
            INSERT INTO products (id, store_id, name, price_cents, stock, min_stock,
                                  is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)
            "#,
        )
        .bind(&id)
        .bind(store_id)
        .bind(name)
        .bind(price_cents)
        .bind(stock)
        .bind(min_stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id).await
    }

    /// Gets a product by UUID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Product> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Lists active products for a store.
    pub async fn list_by_store(&self, store_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE store_id = ?1 AND is_active = 1 ORDER BY name",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Lists products at or below their reorder threshold.
    pub async fn list_low_stock(&self, store_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE store_id = ?1 AND is_active = 1 AND stock <= min_stock
            ORDER BY stock ASC
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Restocks a product (receiving shipment). Plain increment; no
    /// precondition needed since stock only grows here.
    pub async fn restock(&self, id: &str, quantity: i64) -> DbResult<Product> {
        let result = sqlx::query(
            "UPDATE products SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id).await
    }

    /// Creates a new salon service.
    pub async fn create_service(
        &self,
        store_id: &str,
        name: &str,
        price_cents: i64,
        duration_min: i64,
    ) -> DbResult<Service> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO services (id, store_id, name, price_cents, duration_min,
                                  is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)
            "#,
        )
        .bind(&id)
        .bind(store_id)
        .bind(name)
        .bind(price_cents)
        .bind(duration_min)
        .bind(now)
        .execute(&self.pool)
        .await?;

        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ?1")
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Service", &id))
    }

    /// Lists active services for a store.
    pub async fn list_services(&self, store_id: &str) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE store_id = ?1 AND is_active = 1 ORDER BY name",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(services)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn seeded_db() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.stores().create("Aura Salon", "AUR", 1800).await.unwrap();
        (db, store.id)
    }

    #[tokio::test]
    async fn test_decrement_stock_happy_path() {
        let (db, store_id) = seeded_db().await;
        let product = db
            .products()
            .create(&store_id, "Argan Oil Shampoo", 45_000, 10, 2)
            .await
            .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        let outcome = decrement_stock(&mut conn, &product.id, 3).await.unwrap();
        assert_eq!(outcome, StockOutcome::Adjusted);
        drop(conn);

        let after = db.products().get_by_id(&product.id).await.unwrap();
        assert_eq!(after.stock, 7);
    }

    #[tokio::test]
    async fn test_decrement_stock_rejects_oversell() {
        let (db, store_id) = seeded_db().await;
        let product = db
            .products()
            .create(&store_id, "Keratin Serum", 120_000, 2, 1)
            .await
            .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        let outcome = decrement_stock(&mut conn, &product.id, 3).await.unwrap();
        assert_eq!(outcome, StockOutcome::InsufficientStock);

        // stock untouched by the failed attempt
        let stock = fetch_stock(&mut conn, &product.id).await.unwrap();
        assert_eq!(stock, Some(2));
    }

    #[tokio::test]
    async fn test_fetch_stock_missing_product() {
        let (db, _) = seeded_db().await;
        let mut conn = db.pool().acquire().await.unwrap();
        let stock = fetch_stock(&mut conn, "ghost").await.unwrap();
        assert_eq!(stock, None);
    }

    #[tokio::test]
    async fn test_low_stock_listing() {
        let (db, store_id) = seeded_db().await;
        let repo = db.products();

        repo.create(&store_id, "Hair Wax", 30_000, 1, 3).await.unwrap();
        repo.create(&store_id, "Conditioner", 40_000, 20, 3).await.unwrap();

        let low = repo.list_low_stock(&store_id).await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Hair Wax");
        assert!(low[0].is_low_stock());
    }

    #[tokio::test]
    async fn test_restock() {
        let (db, store_id) = seeded_db().await;
        let product = db
            .products()
            .create(&store_id, "Face Mask", 25_000, 0, 5)
            .await
            .unwrap();

        let after = db.products().restock(&product.id, 12).await.unwrap();
        assert_eq!(after.stock, 12);
    }
}
