//! # Repository Pattern Implementation
//!
//! Repositories encapsulate all SQL for a given aggregate. The rest of
//! the crate (and downstream callers) never writes raw queries.
//!
//! ## Two Kinds of Operations
//!
//! Each repository module exposes:
//! - **Pool methods** on the repository struct - standalone reads and
//!   admin writes, each on its own connection
//! - **Connection functions** - free async fns taking
//!   `&mut SqliteConnection`, composed by the settlement engine inside
//!   one database transaction
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Repository Layout                              │
//! │                                                                     │
//! │  StoreRepository        stores + per-store settlement config        │
//! │  CustomerRepository     customers + loyalty ledger CAS              │
//! │  ProductRepository      products + stock adjuster CAS               │
//! │  TransactionRepository  settled headers + line items (read side)    │
//! │  invoice                per-store invoice sequencer                 │
//! │  transaction            header/item inserts (write side, in-tx)     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod customer;
pub mod invoice;
pub mod product;
pub mod store;
pub mod transaction;

pub use customer::CustomerRepository;
pub use product::ProductRepository;
pub use store::StoreRepository;
pub use transaction::TransactionRepository;
