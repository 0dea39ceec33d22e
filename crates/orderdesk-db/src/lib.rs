//! # orderdesk-db: Database Layer for OrderDesk
//!
//! This crate provides database access for the OrderDesk order intake
//! service. It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OrderDesk Data Flow                              │
//! │                                                                         │
//! │  SaleWorkflow / ApprovalResolver (apps/orderdesk)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   orderdesk-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo      │    │ 001_initial_ │  │   │
//! │  │   │ begin() ──────┼─┐  │ ApprovalRepo  │    │   schema.sql │  │   │
//! │  │   └───────────────┘ │  └───────────────┘    └──────────────┘  │   │
//! │  │                     ▼                                           │   │
//! │  │              DbTransaction (transaction.rs)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./orderdesk.db (ORDERDESK_DATABASE_PATH)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Read-side repositories (products, sales, approvals)
//! - [`transaction`] - Explicit transaction scope for workflows
//!
//! ## Usage
//!
//! ```rust,ignore
//! use orderdesk_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("orderdesk.db")).await?;
//!
//! // Read side
//! let pending = db.approvals().list().await?;
//!
//! // Write side
//! let mut tx = db.begin().await?;
//! tx.insert_sale(&sale, &lines).await?;
//! tx.commit().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod transaction;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use transaction::DbTransaction;

// Repository re-exports for convenience
pub use repository::{ApprovalRepository, ProductRepository, RegisterError, SaleRepository};
