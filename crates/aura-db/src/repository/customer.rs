//! # Customer Repository + Loyalty Ledger
//!
//! Customers own the loyalty aggregate state (`loyalty_points`,
//! `total_visits`, `total_spent_cents`). That state is mutated in exactly
//! one place: [`apply_loyalty`], called by the settlement engine inside
//! the settlement transaction.
//!
//! ## Why Compare-And-Swap
//!
//! Two terminals can settle for the same customer concurrently, each
//! having read the same point balance. A read-then-write would let both
//! redemptions through and drive the balance negative. The ledger instead
//! applies the delta with its precondition in one UPDATE:
//!
//! ```sql
//! UPDATE customers
//! SET loyalty_points = loyalty_points + :delta, ...
//! WHERE id = :id AND loyalty_points + :delta >= 0
//! ```
//!
//! `rows_affected == 0` means the balance moved underneath us; the caller
//! rolls the whole settlement back.

use aura_core::{Customer, Membership};
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

// =============================================================================
// In-Transaction Operations (loyalty ledger)
// =============================================================================

/// Outcome of a loyalty CAS attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoyaltyOutcome {
    /// Delta applied; visit and spend aggregates bumped.
    Applied,
    /// Precondition failed: balance would have gone negative
    /// (or the customer row is gone).
    InsufficientPoints,
}

/// Applies a settlement's loyalty effect to a customer row.
///
/// `points_delta` is `earned - redeemed` and may be negative;
/// `spent_cents` is the settled total. Runs inside the caller's
/// transaction so the effect commits (or rolls back) with the
/// settlement header.
pub async fn apply_loyalty(
    conn: &mut SqliteConnection,
    customer_id: &str,
    points_delta: i64,
    spent_cents: i64,
) -> DbResult<LoyaltyOutcome> {
    let result = sqlx::query(
        r#"
        UPDATE customers
        SET loyalty_points = loyalty_points + ?2,
            total_visits = total_visits + 1,
            total_spent_cents = total_spent_cents + ?3,
            updated_at = ?4
        WHERE id = ?1 AND loyalty_points + ?2 >= 0
        "#,
    )
    .bind(customer_id)
    .bind(points_delta)
    .bind(spent_cents)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        debug!(customer_id, points_delta, "Loyalty CAS precondition failed");
        return Ok(LoyaltyOutcome::InsufficientPoints);
    }

    Ok(LoyaltyOutcome::Applied)
}

// =============================================================================
// Repository (pool operations)
// =============================================================================

/// Repository for customer operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Creates a new customer with zeroed loyalty state.
    pub async fn create(
        &self,
        store_id: &str,
        name: &str,
        phone: Option<&str>,
    ) -> DbResult<Customer> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(customer_id = %id, name, "Creating customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, store_id, name, phone, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&id)
        .bind(store_id)
        .bind(name)
        .bind(phone)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id).await
    }

    /// Gets a customer by UUID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Customer> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Lists customers for a store, most recently updated first.
    pub async fn list_by_store(&self, store_id: &str) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE store_id = ?1 ORDER BY updated_at DESC",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    /// Grants a membership plan to a customer.
    pub async fn grant_membership(
        &self,
        customer_id: &str,
        plan_name: &str,
        discount_bps: u32,
        starts_at: chrono::DateTime<Utc>,
        expires_at: chrono::DateTime<Utc>,
    ) -> DbResult<Membership> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO memberships (id, customer_id, plan_name, discount_bps,
                                     starts_at, expires_at, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)
            "#,
        )
        .bind(&id)
        .bind(customer_id)
        .bind(plan_name)
        .bind(discount_bps)
        .bind(starts_at)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        sqlx::query_as::<_, Membership>("SELECT * FROM memberships WHERE id = ?1")
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Membership", &id))
    }

    /// Returns the customer's membership that is active at `at`, if any.
    ///
    /// When plans overlap the deepest discount wins; expiry and the
    /// `is_active` flag are both honored.
    pub async fn active_membership(
        &self,
        customer_id: &str,
        at: chrono::DateTime<Utc>,
    ) -> DbResult<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT * FROM memberships
            WHERE customer_id = ?1
              AND is_active = 1
              AND starts_at <= ?2
              AND expires_at > ?2
            ORDER BY discount_bps DESC
            LIMIT 1
            "#,
        )
        .bind(customer_id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(membership)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    async fn seeded_db() -> (Database, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.stores().create("Aura Salon", "AUR", 1800).await.unwrap();
        let customer = db
            .customers()
            .create(&store.id, "Priya Sharma", Some("+91-98450-00000"))
            .await
            .unwrap();
        (db, store.id, customer.id)
    }

    #[tokio::test]
    async fn test_new_customer_has_zero_loyalty_state() {
        let (db, _, customer_id) = seeded_db().await;
        let customer = db.customers().get_by_id(&customer_id).await.unwrap();
        assert_eq!(customer.loyalty_points, 0);
        assert_eq!(customer.total_visits, 0);
        assert_eq!(customer.total_spent_cents, 0);
    }

    #[tokio::test]
    async fn test_apply_loyalty_positive_delta() {
        let (db, _, customer_id) = seeded_db().await;

        let mut conn = db.pool().acquire().await.unwrap();
        let outcome = apply_loyalty(&mut conn, &customer_id, 23, 236_000)
            .await
            .unwrap();
        assert_eq!(outcome, LoyaltyOutcome::Applied);
        drop(conn);

        let customer = db.customers().get_by_id(&customer_id).await.unwrap();
        assert_eq!(customer.loyalty_points, 23);
        assert_eq!(customer.total_visits, 1);
        assert_eq!(customer.total_spent_cents, 236_000);
    }

    #[tokio::test]
    async fn test_apply_loyalty_rejects_overdraw() {
        let (db, _, customer_id) = seeded_db().await;

        let mut conn = db.pool().acquire().await.unwrap();
        apply_loyalty(&mut conn, &customer_id, 100, 50_000)
            .await
            .unwrap();

        // balance is 100; -150 must be rejected and leave state untouched
        let outcome = apply_loyalty(&mut conn, &customer_id, -150, 10_000)
            .await
            .unwrap();
        assert_eq!(outcome, LoyaltyOutcome::InsufficientPoints);
        drop(conn);

        let customer = db.customers().get_by_id(&customer_id).await.unwrap();
        assert_eq!(customer.loyalty_points, 100);
        assert_eq!(customer.total_visits, 1);
    }

    #[tokio::test]
    async fn test_active_membership_window() {
        let (db, _, customer_id) = seeded_db().await;
        let now = Utc::now();

        db.customers()
            .grant_membership(
                &customer_id,
                "Gold",
                1500,
                now - Duration::days(10),
                now + Duration::days(355),
            )
            .await
            .unwrap();

        let active = db
            .customers()
            .active_membership(&customer_id, now)
            .await
            .unwrap();
        assert_eq!(active.as_ref().map(|m| m.discount_bps), Some(1500));

        // outside the window
        let lapsed = db
            .customers()
            .active_membership(&customer_id, now + Duration::days(400))
            .await
            .unwrap();
        assert!(lapsed.is_none());
    }

    #[tokio::test]
    async fn test_overlapping_memberships_deepest_discount_wins() {
        let (db, _, customer_id) = seeded_db().await;
        let now = Utc::now();

        for (plan, bps) in [("Silver", 1000u32), ("Gold", 1500u32)] {
            db.customers()
                .grant_membership(
                    &customer_id,
                    plan,
                    bps,
                    now - Duration::days(1),
                    now + Duration::days(365),
                )
                .await
                .unwrap();
        }

        let active = db
            .customers()
            .active_membership(&customer_id, now)
            .await
            .unwrap();
        assert_eq!(active.map(|m| m.plan_name), Some("Gold".to_string()));
    }
}
