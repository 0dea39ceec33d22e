//! # Repository Module
//!
//! Database repository implementations for OrderDesk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Read Side vs Write Side                              │
//! │                                                                         │
//! │  Listing / lookup                    Submit / resolve                  │
//! │       │                                   │                             │
//! │       │  db.approvals().list()            │  db.begin()                 │
//! │       ▼                                   ▼                             │
//! │  Repositories (pool)                 DbTransaction (one connection)    │
//! │  ├── ProductRepository               ├── load_catalog / product_by_sku │
//! │  ├── SaleRepository                  ├── insert_sale                   │
//! │  └── ApprovalRepository              ├── insert_approval_request       │
//! │                                      └── claim_approval                │
//! │       │                                   │                             │
//! │       └──────────── same SQL helpers ─────┘                             │
//! │                         │                                               │
//! │                         ▼                                               │
//! │                  SQLite Database                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Catalog registration and lookup
//! - [`SaleRepository`] - Committed sales and their lines
//! - [`ApprovalRepository`] - Approval requests

pub mod approval;
pub mod product;
pub mod sale;

pub use approval::ApprovalRepository;
pub use product::{ProductRepository, RegisterError};
pub use sale::SaleRepository;
