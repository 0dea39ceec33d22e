//! # OrderDesk CLI
//!
//! Operator front end: every command prints one JSON document on stdout.
//! Failures print `{"code": ..., "message": ...}` and exit non-zero.
//!
//! ```text
//! orderdesk [--db PATH] [--policy permissive|strict] <COMMAND>
//!
//!   status                          health, migrations, counts
//!   products                        catalog ordered by SKU
//!   add-product --sku --name --full-price-cents --discounted-price-cents
//!   submit [--file PATH]            SubmitOrder body (stdin when omitted or "-")
//!   resolve <ID> <DECISION>         accepted | denied
//!   approvals [--status STATUS]     approval requests
//!   sales                           sales, newest first
//!   sale <ID>                       one sale with its lines
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info};

use orderdesk::config::{ENV_DATABASE_PATH, ENV_SELECTOR_POLICY};
use orderdesk::dto::{RegisterProductRequest, ResolveApprovalRequest, SubmitOrderRequest};
use orderdesk::{init_tracing, ApiResult, AppConfig, OrderDesk};
use orderdesk_core::{ApprovalStatus, SelectorPolicy};

#[derive(Debug, Parser)]
#[command(
    name = "orderdesk",
    version,
    about = "OrderDesk order intake CLI",
    after_help = "Examples:\n  orderdesk products\n  orderdesk submit --file order.json\n  orderdesk resolve 3f2b... accepted"
)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = ENV_DATABASE_PATH)]
    db: Option<PathBuf>,

    /// Treatment of unlisted region/deadline codes (any case, like the config loader)
    #[arg(long, global = true, value_enum, ignore_case = true, env = ENV_SELECTOR_POLICY)]
    policy: Option<PolicyArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Permissive,
    Strict,
}

impl From<PolicyArg> for SelectorPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Permissive => SelectorPolicy::Permissive,
            PolicyArg::Strict => SelectorPolicy::Strict,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Pending,
    Accepted,
    Denied,
}

impl From<StatusArg> for ApprovalStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => ApprovalStatus::Pending,
            StatusArg::Accepted => ApprovalStatus::Accepted,
            StatusArg::Denied => ApprovalStatus::Denied,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Report database health, migrations and record counts")]
    Status,
    #[command(about = "List the catalog ordered by SKU")]
    Products,
    #[command(about = "Register a product")]
    AddProduct {
        #[arg(long)]
        sku: String,
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        full_price_cents: i64,
        #[arg(long, allow_negative_numbers = true)]
        discounted_price_cents: i64,
    },
    #[command(about = "Submit an order (JSON body) and print the sale or approval request")]
    Submit {
        /// JSON file with the order; "-" or omitted reads stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    #[command(about = "Accept or deny a pending approval request")]
    Resolve { id: String, decision: String },
    #[command(about = "List approval requests")]
    Approvals {
        #[arg(long, value_enum, ignore_case = true)]
        status: Option<StatusArg>,
    },
    #[command(about = "List sales, newest first")]
    Sales,
    #[command(about = "Show one sale with its lines")]
    Sale { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();

    // flags win over the environment
    let mut config = AppConfig::load().context("loading configuration")?;
    if let Some(path) = cli.db {
        config.database_path = path;
    }
    if let Some(policy) = cli.policy {
        config.selector_policy = policy.into();
    }

    info!(
        path = %config.database_path.display(),
        policy = ?config.selector_policy,
        "Starting OrderDesk"
    );

    let desk = match OrderDesk::open(config).await {
        Ok(desk) => desk,
        Err(err) => return Ok(report(Err::<(), _>(err))),
    };

    let exit = match cli.command {
        Command::Status => report(desk.status().await),
        Command::Products => report(desk.list_products().await),
        Command::AddProduct {
            sku,
            name,
            full_price_cents,
            discounted_price_cents,
        } => report(
            desk.register_product(RegisterProductRequest {
                sku: Some(sku),
                name: Some(name),
                full_price_cents: Some(full_price_cents),
                discounted_price_cents: Some(discounted_price_cents),
            })
            .await,
        ),
        Command::Submit { file } => {
            let body = read_body(file.as_deref())?;
            match parse_body::<SubmitOrderRequest>(&body) {
                Ok(request) => report(desk.submit_order(request).await),
                Err(err) => report(Err::<(), _>(err)),
            }
        }
        Command::Resolve { id, decision } => report(
            desk.resolve_approval(
                &id,
                ResolveApprovalRequest {
                    decision: Some(decision),
                },
            )
            .await,
        ),
        Command::Approvals { status } => {
            report(desk.list_approval_requests(status.map(Into::into)).await)
        }
        Command::Sales => report(desk.list_sales().await),
        Command::Sale { id } => report(desk.sale_detail(&id).await),
    };

    desk.database().close().await;
    Ok(exit)
}

/// Reads a request body from a file, or stdin for `None` / `-`.
fn read_body(file: Option<&std::path::Path>) -> anyhow::Result<String> {
    let mut body = String::new();

    match file {
        Some(path) if path.as_os_str() != "-" => {
            body = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
        }
        _ => {
            std::io::stdin()
                .read_to_string(&mut body)
                .context("reading request body from stdin")?;
        }
    }

    Ok(body)
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> ApiResult<T> {
    Ok(serde_json::from_str(body)?)
}

/// Prints the result as JSON and returns the process exit code.
fn report<T: Serialize>(result: ApiResult<T>) -> ExitCode {
    match result {
        Ok(value) => {
            print_json(&value);
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_json(&err);
            ExitCode::from(err.code.exit_code())
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!(error = %e, "Failed to serialize response"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_flag_ignores_case() {
        for value in ["strict", "STRICT", "Strict"] {
            let cli = Cli::try_parse_from(["orderdesk", "--policy", value, "products"]).unwrap();
            assert!(matches!(cli.policy, Some(PolicyArg::Strict)), "{value}");
        }

        let cli = Cli::try_parse_from(["orderdesk", "approvals", "--status", "Pending"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Approvals {
                status: Some(StatusArg::Pending)
            }
        ));

        assert!(Cli::try_parse_from(["orderdesk", "--policy", "lenient", "products"]).is_err());
    }
}
