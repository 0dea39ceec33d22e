//! # OrderDesk
//!
//! Order intake: prices orders against the catalog, enforces the discount
//! ceiling, and routes out-of-policy discounts through approval.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OrderDesk Application                            │
//! │                                                                         │
//! │   JSON request                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   dto (deny unknown fields) ──► OrderRequest (validated)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   commands::OrderDesk                                                  │
//! │       ├── workflow::SaleWorkflow      ─┐                               │
//! │       └── workflow::ApprovalResolver  ─┼─► orderdesk-db transaction    │
//! │                                         │                               │
//! │                                         └─► orderdesk-core OrderPricer │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   Response DTO  or  ApiError { code, message }                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Environment configuration
//! - [`dto`] - Request and response wire shapes
//! - [`error`] - `ApiError` and the mapping from lower layers
//! - [`workflow`] - Sale submission and approval resolution
//! - [`commands`] - The operations, wire types in and out

pub mod commands;
pub mod config;
pub mod dto;
pub mod error;
pub mod workflow;

pub use commands::{OrderDesk, StatusReport};
pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};

use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,orderdesk=debug,sqlx=warn";

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show all debug logs
/// - `RUST_LOG=orderdesk=trace` - Trace for orderdesk crates only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Logs go to stderr so stdout stays clean JSON.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
