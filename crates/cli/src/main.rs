//! Checkout CLI - Order inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Print the checkout facts of an order
//! checkout-cli resolve --order-id wRPpheqxyZ --access-token "$TOKEN"
//!
//! # Against a specific backend, failing loudly
//! checkout-cli resolve -o wRPpheqxyZ -t "$TOKEN" --endpoint https://acme.commercelayer.io --strict
//! ```
//!
//! # Commands
//!
//! - `resolve` - Load an order and print its checkout facts as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use clap::{Parser, Subcommand};

mod commands;

use commands::resolve::ResolveOptions;

#[derive(Parser)]
#[command(name = "checkout-cli")]
#[command(author, version, about = "Checkout CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an order and print its checkout facts
    Resolve {
        /// Order identifier
        #[arg(short, long)]
        order_id: String,

        /// Access token for the order
        #[arg(short = 't', long, env = "CHECKOUT_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,

        /// Commerce backend URL (defaults to `COMMERCE_API_ENDPOINT`)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Timeout in seconds for loading the order
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,

        /// Exit with an error instead of printing fallback facts
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Resolve {
            order_id,
            access_token,
            endpoint,
            timeout_secs,
            strict,
        } => {
            commands::resolve::run(ResolveOptions {
                order_id,
                access_token,
                endpoint,
                timeout: Duration::from_secs(timeout_secs),
                strict,
            })
            .await?;
        }
    }
    Ok(())
}
