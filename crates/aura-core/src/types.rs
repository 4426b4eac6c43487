//! # Domain Types
//!
//! Core domain types for the Aura POS settlement engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐   ┌─────────────────┐   ┌──────────────────┐    │
//! │  │    LineItem    │   │   Transaction   │   │ TransactionItem  │    │
//! │  │  ────────────  │   │  ─────────────  │   │  ──────────────  │    │
//! │  │  item_type     │   │  id (UUID)      │   │  id (UUID)       │    │
//! │  │  unit_price    │──►│  invoice_number │◄──│  transaction_id  │    │
//! │  │  quantity      │   │  total_cents    │   │  total_cents     │    │
//! │  └────────────────┘   └─────────────────┘   └──────────────────┘    │
//! │     (ephemeral)          (immutable)           (immutable)          │
//! │                                                                     │
//! │  ┌────────────────┐   ┌─────────────────┐   ┌──────────────────┐    │
//! │  │    Customer    │   │   Membership    │   │     Product      │    │
//! │  │  loyalty state │   │  discount_bps   │   │  stock counters  │    │
//! │  └────────────────┘   └─────────────────┘   └──────────────────┘    │
//! │    (ledger-owned)      (pricing input)       (adjuster-owned)       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every persisted entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists (invoice_number) - human-readable,
//!   issued by the invoice sequencer at settlement time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (GST on salon services)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Item Type
// =============================================================================

/// What kind of catalog entry a line item refers to.
///
/// Services (haircut, facial) never touch inventory; products (shampoo,
/// serum) decrement stock at settlement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// A salon service; no stock effect.
    Service,
    /// A retail product; stock is decremented at settlement.
    Product,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// UPI / wallet transfer.
    Upi,
}

// =============================================================================
// Line Item (cart entry)
// =============================================================================

/// A single service or product entry in a cart.
///
/// Ephemeral: exists only while the cart is assembled and inside the
/// settlement request. Becomes an immutable [`TransactionItem`] once the
/// settlement commits.
///
/// Serialized camelCase because this is the shape the UI cart sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Service or product.
    pub item_type: ItemType,

    /// Catalog id of the service/product this line refers to.
    pub item_id: String,

    /// Display name shown on the receipt.
    pub name: String,

    /// Unit price in cents. Must be >= 0.
    pub unit_price_cents: i64,

    /// Quantity. Must be >= 1.
    pub quantity: i64,

    /// Staff entered a price different from the catalog price.
    /// Custom-priced items are accepted as sent (a staff override,
    /// authorized at the terminal); catalog-priced items - services and
    /// products alike - are re-priced server-side from their catalog row.
    pub is_custom_price: bool,
}

impl LineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total (`unit_price * quantity`), overflow-checked.
    ///
    /// Exact integer math: the invariant `total == unit_price * quantity`
    /// holds with no per-item rounding.
    #[inline]
    pub fn total(&self) -> Option<Money> {
        self.unit_price().checked_mul_quantity(self.quantity)
    }
}

// =============================================================================
// Transaction (settlement header)
// =============================================================================

/// A committed settlement header.
///
/// Immutable once written: corrections are new compensating transactions,
/// never in-place edits. Invariant (enforced by the pricing calculator):
/// `total_cents == subtotal_cents - discount_cents + tax_cents`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub store_id: String,
    pub customer_id: Option<String>,
    /// Store-scoped unique business identifier (e.g. `AUR-000042`).
    pub invoice_number: String,
    pub subtotal_cents: i64,
    /// Total discount: membership discount + redeemed point value.
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub points_earned: i64,
    pub points_redeemed: i64,
    /// Membership portion of the discount, kept separately for receipts.
    pub membership_discount_cents: i64,
    pub staff_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns the settled total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Transaction Item
// =============================================================================

/// An immutable line-item row belonging to a committed transaction.
///
/// Snapshot pattern: name and unit price are frozen at settlement time so
/// the receipt survives later catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    pub item_type: ItemType,
    pub item_id: String,
    /// Name at time of settlement (frozen).
    pub name: String,
    /// Unit price in cents at time of settlement (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
    /// Exactly `unit_price_cents * quantity`.
    pub total_cents: i64,
    pub is_custom_price: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Customer (loyalty state owner)
// =============================================================================

/// A customer record with its loyalty aggregate state.
///
/// `loyalty_points`, `total_visits` and `total_spent_cents` are mutated
/// only by the loyalty ledger as part of a committed settlement; they are
/// never cached or recomputed elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub phone: Option<String>,
    /// Redeemable point balance; never negative.
    pub loyalty_points: i64,
    pub total_visits: i64,
    pub total_spent_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Membership
// =============================================================================

/// A customer's membership plan; read-only input to pricing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Membership {
    pub id: String,
    pub customer_id: String,
    pub plan_name: String,
    /// Percentage off the subtotal, in basis points (1500 = 15%).
    pub discount_bps: u32,
    #[ts(as = "String")]
    pub starts_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Membership {
    /// True when the membership window covers `at` and the plan is active.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.is_active && self.starts_at <= at && at < self.expires_at
    }
}

// =============================================================================
// Product (stock owner)
// =============================================================================

/// A retail product; `stock` is mutated only by the stock adjuster.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub store_id: String,
    pub name: String,
    /// Catalog price in cents.
    pub price_cents: i64,
    /// On-hand quantity; never negative.
    pub stock: i64,
    /// Reorder threshold (informational; restocking is out of scope).
    pub min_stock: i64,
    /// Whether product is sellable (soft delete).
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the catalog price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// True when on-hand stock has fallen to or below the threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

// =============================================================================
// Service
// =============================================================================

/// A salon service catalog entry (no inventory).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Service {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub price_cents: i64,
    /// Duration in minutes, used by the appointment book (out of scope).
    pub duration_min: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Store
// =============================================================================

/// A store (tenant) with its settlement configuration.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Store {
    pub id: String,
    pub name: String,
    /// Prefix for invoice numbers issued by this store (e.g. `AUR`).
    pub invoice_prefix: String,
    /// Store-configured tax rate in basis points.
    pub tax_rate_bps: u32,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// Returns the store's tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

// =============================================================================
// Settlement Request (UI cart boundary)
// =============================================================================

/// The settlement request the UI cart sends to the engine.
///
/// Only raw line items cross this boundary. Any totals the client computed
/// for preview are advisory and are discarded: the engine recomputes
/// pricing from scratch against authoritative data.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRequest {
    pub store_id: String,
    pub customer_id: Option<String>,
    pub items: Vec<LineItem>,
    pub payment_method: PaymentMethod,
    pub staff_id: String,
    /// Requested point redemption; clamped server-side to
    /// `min(requested, balance, subtotal)`.
    pub points_to_redeem: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_default_is_18_percent() {
        let rate = TaxRate::default();
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_line_item_total_is_exact() {
        let item = LineItem {
            item_type: ItemType::Product,
            item_id: "p1".to_string(),
            name: "Shampoo".to_string(),
            unit_price_cents: 50_000,
            quantity: 2,
            is_custom_price: false,
        };
        assert_eq!(item.total().map(|m| m.cents()), Some(100_000));
    }

    #[test]
    fn test_membership_active_window() {
        let now = Utc::now();
        let membership = Membership {
            id: "m1".to_string(),
            customer_id: "c1".to_string(),
            plan_name: "Gold".to_string(),
            discount_bps: 1500,
            starts_at: now - chrono::Duration::days(30),
            expires_at: now + chrono::Duration::days(30),
            is_active: true,
        };

        assert!(membership.is_active_at(now));
        assert!(!membership.is_active_at(now + chrono::Duration::days(60)));
        assert!(!membership.is_active_at(now - chrono::Duration::days(60)));

        let lapsed = Membership {
            is_active: false,
            ..membership
        };
        assert!(!lapsed.is_active_at(now));
    }

    #[test]
    fn test_line_item_serde_shape() {
        let item = LineItem {
            item_type: ItemType::Service,
            item_id: "s1".to_string(),
            name: "Haircut".to_string(),
            unit_price_cents: 100_000,
            quantity: 1,
            is_custom_price: false,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["itemType"], "service");
        assert_eq!(json["unitPriceCents"], 100_000);
    }
}
