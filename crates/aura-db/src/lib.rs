//! # aura-db: Database Layer + Settlement Engine for Aura POS
//!
//! This crate owns persistence and the settlement transaction for the
//! Aura POS billing engine. SQLite for local storage, sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Aura POS Data Flow                            │
//! │                                                                     │
//! │  SettlementRequest (from the salon UI cart)                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                   aura-db (THIS CRATE)                      │    │
//! │  │                                                             │    │
//! │  │   ┌─────────────┐   ┌──────────────┐   ┌───────────────┐    │    │
//! │  │   │  Database   │   │ Repositories │   │  Settlement   │    │    │
//! │  │   │  (pool.rs)  │   │ store/cust/  │   │    Engine     │    │    │
//! │  │   │             │◄──│ product/txn  │◄──│ one tx per    │    │    │
//! │  │   │ SqlitePool  │   │ + invoice    │   │  settlement   │    │    │
//! │  │   └─────────────┘   └──────────────┘   └───────────────┘    │    │
//! │  │                                                             │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite (WAL mode, foreign keys on, embedded migrations)            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repositories (store, customer, product, transaction)
//!   plus the invoice sequencer
//! - [`settlement`] - The settlement engine: pricing, invoice, stock and
//!   loyalty effects in one database transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aura_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/aura.db")).await?;
//!
//! let receipt = db.settlements().settle(&request).await?;
//! println!("settled {}", receipt.transaction.invoice_number);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod settlement;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use settlement::{SettlementEngine, SettlementError, SettlementReceipt};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::store::StoreRepository;
pub use repository::transaction::TransactionRepository;
