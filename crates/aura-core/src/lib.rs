//! # aura-core: Pure Settlement Logic for Aura POS
//!
//! This crate is the **heart** of the Aura POS billing engine. It contains
//! the pricing calculator and every domain type the settlement path touches,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Aura POS Architecture                         │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                  Salon UI (cart preview)                    │    │
//! │  └────────────────────────────┬────────────────────────────────┘    │
//! │                               │ SettlementRequest                   │
//! │  ┌────────────────────────────▼────────────────────────────────┐    │
//! │  │              ★ aura-core (THIS CRATE) ★                     │    │
//! │  │                                                             │    │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐    │    │
//! │  │   │  types   │  │  money   │  │ pricing  │  │validation│    │    │
//! │  │   │ LineItem │  │  Money   │  │PriceQuote│  │  rules   │    │    │
//! │  │   │ Txn/Item │  │ TaxRate  │  │price_cart│  │  checks  │    │    │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────┘    │    │
//! │  │                                                             │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │    │
//! │  └────────────────────────────┬────────────────────────────────┘    │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐    │
//! │  │                 aura-db (settlement engine)                 │    │
//! │  │       SQLite transaction, stock + loyalty side effects      │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, Transaction, Customer, Membership, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - The pricing calculator: cart → subtotal/discount/tax/total
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same inputs always produce bit-identical output -
//!    the UI previews a quote and the server must reproduce it exactly
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use aura_core::money::Money;
//! use aura_core::types::TaxRate;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(100_000); // 1000.00
//!
//! let tax_rate = TaxRate::from_bps(1800); // 18%
//! let tax = price.scale_bps(tax_rate.bps());
//! assert_eq!(tax.cents(), 18_000); // 180.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use aura_core::Money` instead of
// `use aura_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{price_cart, PriceQuote, PricingInput};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tax rate in basis points (18% GST).
///
/// Every store carries its own configured rate; this is the value a store
/// row starts with and the value the calculator uses when no store
/// configuration is supplied.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1800;

/// Loyalty earn rate in basis points of the settled total (1%).
///
/// Earned points are whole points: `floor(total * 1%)` in currency units.
pub const LOYALTY_EARN_RATE_BPS: u32 = 100;

/// Value of one loyalty point in cents (1 point == 1 currency unit).
pub const CENTS_PER_POINT: i64 = 100;

/// Maximum line items allowed in a single cart.
///
/// Prevents runaway carts and keeps settlement transactions bounded.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Bounded retry budget for invoice-number races.
///
/// Two terminals settling for the same store can collide on the invoice
/// uniqueness constraint; the settlement engine retries the whole attempt
/// this many times before surfacing an error.
pub const MAX_INVOICE_ATTEMPTS: u32 = 3;
