//! Trott e Perf session CLI - Inspect and drive the customer session store.
//!
//! # Usage
//!
//! ```bash
//! # Store a customer access token obtained from the backend
//! tp-session login --token <TOKEN>
//!
//! # Store the customer profile from a JSON file
//! tp-session customer --file customer.json
//!
//! # Show the current session (never prints the token)
//! tp-session show
//!
//! # Remember or forget the cart
//! tp-session cart set gid://shopify/Cart/abc
//! tp-session cart clear
//!
//! # Log out (clears token, customer and cart)
//! tp-session logout
//! ```
//!
//! # Environment Variables
//!
//! See `trottperf_session::config` for storage settings; `SENTRY_DSN`
//! enables error tracking.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trottperf_session::{CartBuyer, FileStorage, SessionConfig, SessionStore};

mod commands;

#[derive(Parser)]
#[command(name = "tp-session")]
#[command(author, version, about = "Trott e Perf customer session tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a customer access token
    Login {
        /// Access token issued by the commerce backend
        #[arg(short, long)]
        token: String,
    },
    /// Set or clear the customer profile
    Customer {
        /// JSON file holding the customer profile
        #[arg(short, long, conflicts_with = "clear", required_unless_present = "clear")]
        file: Option<PathBuf>,

        /// Clear the stored profile
        #[arg(long)]
        clear: bool,
    },
    /// Show the current session
    Show,
    /// Log the customer out
    Logout,
    /// Manage the remembered cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Remember a cart id
    Set {
        /// Cart id returned by the commerce backend
        id: String,
    },
    /// Forget the cart
    Clear,
}

/// Log filter used when `RUST_LOG` is unset: info for the session library
/// and for this binary.
fn default_log_directive() -> String {
    format!("trottperf_session=info,{}=info", env!("CARGO_CRATE_NAME"))
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok()?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn main() {
    // Load .env before reading SENTRY_DSN (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Sentry must be initialised before the tracing subscriber
    let sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_log_directive().into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = SessionConfig::from_env()?;
    let storage = Arc::new(FileStorage::open_or_recover(&config.storage_path)?);
    tracing::debug!(path = %storage.path().display(), "Using session storage");

    let mut store = SessionStore::hydrate(Arc::clone(&storage), config);
    let mut cart = CartBuyer::new(Arc::clone(&storage), store.subscribe());

    match cli.command {
        Commands::Login { token } => commands::session::login(&mut store, &token)?,
        Commands::Customer { file: Some(path), .. } => {
            commands::session::set_customer_from_file(&mut store, &path)?;
        }
        Commands::Customer { .. } => commands::session::clear_customer(&mut store),
        Commands::Show => commands::session::show(&store, &mut cart)?,
        Commands::Logout => commands::session::logout(&mut store),
        Commands::Cart { action } => match action {
            CartAction::Set { id } => commands::cart::set(&cart, &id)?,
            CartAction::Clear => commands::cart::clear(&cart)?,
        },
    }

    if store.write_failures() > 0 {
        tracing::warn!(
            failures = store.write_failures(),
            "Some session changes were not persisted"
        );
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_directive_targets_binary() {
        let directive = default_log_directive();
        assert!(directive.contains("tp_session=info"));
        assert!(directive.contains("trottperf_session=info"));
        tracing_subscriber::EnvFilter::try_new(&directive).unwrap();
    }

    #[test]
    fn test_cli_parses_login() {
        let cli = Cli::try_parse_from(["tp-session", "login", "--token", "tok"]).unwrap();
        assert!(matches!(cli.command, Commands::Login { token } if token == "tok"));
    }
}
