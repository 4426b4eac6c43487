//! # Settlement Engine (Transaction Writer)
//!
//! Orchestrates a complete settlement: authoritative re-pricing, invoice
//! sequencing, header/item writes, stock adjustment and the loyalty
//! ledger - all inside ONE database transaction.
//!
//! ## Settlement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      settle(request)                                │
//! │                                                                     │
//! │  validate ─► load store / customer / membership                     │
//! │      │                                                              │
//! │      ▼                                                              │
//! │  re-price catalog lines ─► price_cart (authoritative)               │
//! │      │                                                              │
//! │      ▼                                                              │
//! │  BEGIN ──► invoice number ──► header ──► items ──► stock CAS ──►    │
//! │            loyalty CAS ──► COMMIT                                   │
//! │      │                                                              │
//! │      └─ any step fails ─► ROLLBACK (no partial state observable)    │
//! │                                                                     │
//! │  duplicate invoice on insert ─► retry whole attempt (bounded)       │
//! │  commit round-trip lost ─► reconciliation_log + CommitUnknown       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Client-computed totals in the request are never trusted; amounts are
//! recomputed here against current membership and balance data.

use aura_core::{
    price_cart, validation, CoreError, ItemType, LineItem, PriceQuote, PricingInput,
    SettlementRequest, Transaction, TransactionItem, MAX_INVOICE_ATTEMPTS,
};
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::customer::{self, LoyaltyOutcome};
use crate::repository::invoice;
use crate::repository::product::{self, StockOutcome};
use crate::repository::transaction as txn_repo;
use crate::repository::{CustomerRepository, StoreRepository};

// =============================================================================
// Errors
// =============================================================================

/// Errors a settlement attempt can produce.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Pricing or request validation failed.
    #[error(transparent)]
    Pricing(#[from] CoreError),

    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// A catalog-priced product line refers to a missing or inactive
    /// product.
    #[error("Product not found or inactive: {0}")]
    ProductNotFound(String),

    /// A catalog-priced service line refers to a missing or inactive
    /// service.
    #[error("Service not found or inactive: {0}")]
    ServiceNotFound(String),

    /// Another settlement took the stock first; the client's cart view
    /// is stale.
    #[error("Insufficient stock for {name}: {available} on hand, {requested} requested")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Another settlement spent the points first; the client's balance
    /// view is stale.
    #[error("Insufficient loyalty points for customer {customer_id}: {requested} requested")]
    InsufficientPoints { customer_id: String, requested: i64 },

    /// Points were requested on an anonymous settlement.
    #[error("Point redemption requires a customer")]
    RedemptionRequiresCustomer,

    /// Invoice insert kept colliding after the bounded retries.
    #[error("Could not obtain a unique invoice number after {attempts} attempts")]
    InvoiceGeneration { attempts: u32 },

    /// The commit round-trip failed with the durable outcome unknown.
    /// A reconciliation_log row has been written; do NOT blindly re-run
    /// the settlement.
    #[error("Settlement {transaction_id} commit outcome unknown; flagged for reconciliation")]
    CommitUnknown { transaction_id: String },

    #[error(transparent)]
    Db(#[from] DbError),
}

impl SettlementError {
    /// True when the failure was a stale concurrent read: the client
    /// should refresh the cart/balance view and may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SettlementError::InsufficientStock { .. }
                | SettlementError::InsufficientPoints { .. }
        )
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A committed settlement, returned to the caller for receipt rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementReceipt {
    pub transaction: Transaction,
    pub items: Vec<TransactionItem>,
}

// =============================================================================
// Engine
// =============================================================================

/// The settlement engine. Cheap to clone; wraps the shared pool.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    pool: SqlitePool,
}

impl SettlementEngine {
    pub fn new(pool: SqlitePool) -> Self {
        SettlementEngine { pool }
    }

    /// Settles a cart: prices it, issues an invoice number and commits
    /// header, items, stock and loyalty effects atomically.
    #[instrument(skip(self, request), fields(store_id = %request.store_id))]
    pub async fn settle(
        &self,
        request: &SettlementRequest,
    ) -> Result<SettlementReceipt, SettlementError> {
        validation::validate_cart_size(request.items.len()).map_err(CoreError::from)?;
        validation::validate_points_to_redeem(request.points_to_redeem)
            .map_err(CoreError::from)?;
        validation::validate_uuid("storeId", &request.store_id).map_err(CoreError::from)?;
        if let Some(customer_id) = &request.customer_id {
            validation::validate_uuid("customerId", customer_id).map_err(CoreError::from)?;
        }

        if request.points_to_redeem > 0 && request.customer_id.is_none() {
            return Err(SettlementError::RedemptionRequiresCustomer);
        }

        let store = StoreRepository::new(self.pool.clone())
            .get_by_id(&request.store_id)
            .await
            .map_err(|e| match e {
                DbError::NotFound { .. } => {
                    SettlementError::StoreNotFound(request.store_id.clone())
                }
                other => SettlementError::Db(other),
            })?;

        let customers = CustomerRepository::new(self.pool.clone());
        let (available_points, membership) = match &request.customer_id {
            Some(customer_id) => {
                let customer = customers.get_by_id(customer_id).await.map_err(|e| match e {
                    DbError::NotFound { .. } => {
                        SettlementError::CustomerNotFound(customer_id.clone())
                    }
                    other => SettlementError::Db(other),
                })?;
                let membership = customers
                    .active_membership(customer_id, Utc::now())
                    .await?;
                (customer.loyalty_points, membership)
            }
            None => (0, None),
        };

        // Authoritative line items: catalog-priced lines are re-priced
        // from their catalog row; custom-priced lines are taken as sent.
        let items = self.reprice_items(&request.items).await?;

        let quote = price_cart(&PricingInput {
            line_items: &items,
            membership: membership.as_ref(),
            available_points,
            requested_points: request.points_to_redeem,
            tax_rate: store.tax_rate(),
        })?;

        // Bounded retry: only an invoice-number collision (another
        // writer committed the same number first) restarts the attempt.
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .try_settle_once(request, &store.invoice_prefix, &items, &quote)
                .await
            {
                Ok(receipt) => {
                    info!(
                        invoice = %receipt.transaction.invoice_number,
                        total_cents = receipt.transaction.total_cents,
                        "Settlement committed"
                    );
                    return Ok(receipt);
                }
                Err(SettlementError::Db(db_err))
                    if db_err.is_unique_violation_on("invoice_number") =>
                {
                    warn!(attempt, "Invoice number collision, retrying settlement");
                    if attempt >= MAX_INVOICE_ATTEMPTS {
                        return Err(SettlementError::InvoiceGeneration {
                            attempts: attempt,
                        });
                    }
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// One full settlement attempt inside one database transaction.
    /// Dropping the transaction on any error path rolls everything back.
    async fn try_settle_once(
        &self,
        request: &SettlementRequest,
        invoice_prefix: &str,
        items: &[LineItem],
        quote: &PriceQuote,
    ) -> Result<SettlementReceipt, SettlementError> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let invoice_number =
            invoice::next_invoice_number(&mut tx, &request.store_id, invoice_prefix).await?;

        let now = Utc::now();
        let transaction_id = Uuid::new_v4().to_string();

        let header = Transaction {
            id: transaction_id.clone(),
            store_id: request.store_id.clone(),
            customer_id: request.customer_id.clone(),
            invoice_number,
            subtotal_cents: quote.subtotal.cents(),
            discount_cents: quote.discount.cents(),
            tax_cents: quote.tax.cents(),
            total_cents: quote.total.cents(),
            payment_method: request.payment_method,
            points_earned: quote.points_earned,
            points_redeemed: quote.points_redeemed,
            membership_discount_cents: quote.membership_discount.cents(),
            staff_id: request.staff_id.clone(),
            created_at: now,
        };

        txn_repo::insert_header(&mut tx, &header).await?;

        let item_rows: Vec<TransactionItem> = items
            .iter()
            .map(|item| TransactionItem {
                id: Uuid::new_v4().to_string(),
                transaction_id: transaction_id.clone(),
                item_type: item.item_type,
                item_id: item.item_id.clone(),
                name: item.name.clone(),
                unit_price_cents: item.unit_price_cents,
                quantity: item.quantity,
                total_cents: item.unit_price_cents * item.quantity,
                is_custom_price: item.is_custom_price,
                created_at: now,
            })
            .collect();

        txn_repo::insert_items(&mut tx, &item_rows).await?;

        // Stock adjuster: guarded decrement per product line. A failed
        // precondition aborts the attempt; the re-read only serves the
        // error message.
        for item in items.iter().filter(|i| i.item_type == ItemType::Product) {
            let outcome = product::decrement_stock(&mut tx, &item.item_id, item.quantity).await?;
            if outcome == StockOutcome::InsufficientStock {
                let available = product::fetch_stock(&mut tx, &item.item_id).await?;
                return Err(match available {
                    None => SettlementError::ProductNotFound(item.item_id.clone()),
                    Some(on_hand) => SettlementError::InsufficientStock {
                        name: item.name.clone(),
                        available: on_hand,
                        requested: item.quantity,
                    },
                });
            }
        }

        // Loyalty ledger: one guarded delta covering earn and redeem.
        if let Some(customer_id) = &request.customer_id {
            let delta = quote.points_earned - quote.points_redeemed;
            let outcome =
                customer::apply_loyalty(&mut tx, customer_id, delta, quote.total.cents()).await?;
            if outcome == LoyaltyOutcome::InsufficientPoints {
                return Err(SettlementError::InsufficientPoints {
                    customer_id: customer_id.clone(),
                    requested: quote.points_redeemed,
                });
            }
        }

        if let Err(commit_err) = tx.commit().await {
            // The commit round-trip failed; SQLite may or may not have
            // made the transaction durable. Flag it instead of guessing.
            error!(%transaction_id, error = %commit_err, "Settlement commit outcome unknown");
            self.log_unknown_commit(&transaction_id, &commit_err.to_string())
                .await;
            return Err(SettlementError::CommitUnknown { transaction_id });
        }

        Ok(SettlementReceipt {
            transaction: header,
            items: item_rows,
        })
    }

    /// Replaces catalog-priced line prices and names with the current
    /// catalog row, for services and products alike. Custom-priced lines
    /// pass through as sent: `is_custom_price` is a staff override
    /// authorized at the terminal, and the terminal is the trust
    /// boundary of this engine (caller authentication lives outside it).
    async fn reprice_items(&self, items: &[LineItem]) -> Result<Vec<LineItem>, SettlementError> {
        let mut priced = Vec::with_capacity(items.len());

        for item in items {
            let mut item = item.clone();
            if !item.is_custom_price {
                match item.item_type {
                    ItemType::Product => {
                        let row = sqlx::query_as::<_, aura_core::Product>(
                            "SELECT * FROM products WHERE id = ?1 AND is_active = 1",
                        )
                        .bind(&item.item_id)
                        .fetch_optional(&self.pool)
                        .await
                        .map_err(DbError::from)?
                        .ok_or_else(|| SettlementError::ProductNotFound(item.item_id.clone()))?;

                        item.unit_price_cents = row.price_cents;
                        item.name = row.name;
                    }
                    ItemType::Service => {
                        let row = sqlx::query_as::<_, aura_core::Service>(
                            "SELECT * FROM services WHERE id = ?1 AND is_active = 1",
                        )
                        .bind(&item.item_id)
                        .fetch_optional(&self.pool)
                        .await
                        .map_err(DbError::from)?
                        .ok_or_else(|| SettlementError::ServiceNotFound(item.item_id.clone()))?;

                        item.unit_price_cents = row.price_cents;
                        item.name = row.name;
                    }
                }
            }
            priced.push(item);
        }

        Ok(priced)
    }

    /// Best-effort reconciliation record for a lost commit round-trip.
    /// Uses a fresh connection: the broken transaction's connection is
    /// in an unknown state.
    async fn log_unknown_commit(&self, transaction_id: &str, detail: &str) {
        let result: DbResult<_> = sqlx::query(
            r#"
            INSERT INTO reconciliation_log (id, transaction_id, phase, detail, resolved, created_at)
            VALUES (?1, ?2, 'commit', ?3, 0, ?4)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(transaction_id)
        .bind(detail)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(DbError::from);

        if let Err(e) = result {
            error!(%transaction_id, error = %e, "Failed to write reconciliation record");
        }
    }
}

// =============================================================================
// Integration-style Tests (in-memory database)
// =============================================================================
