//! TCG Store CLI - drives the local storefront state.
//!
//! # Usage
//!
//! ```bash
//! # Register and log in
//! tcg register --first-name Ash --last-name Ketchum --rut 12345678-9 \
//!     --email ash@pallet.town --address "Pallet Town 1" --phone 912345678 \
//!     --password 'Pikachu.25'
//! tcg login -e ash@pallet.town -p 'Pikachu.25'
//!
//! # Catalog and cart
//! tcg products add --name "Booster Box" --price 78000
//! tcg cart add "Booster Box"
//! tcg cart show
//! ```
//!
//! # Commands
//!
//! - `register`, `login`, `logout`, `whoami`, `profile` - Account session
//! - `users list`, `attempts list` - Directory and login log
//! - `products add|list|remove|fetch` - Local catalog (and main service listing)
//! - `cart show|add|inc|dec|remove|clear` - Cart
//!
//! The preference file is taken from `--store`, then `TCG_STORE_PATH`.
//! Log output goes to stderr and is filtered with `RUST_LOG`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tcg_storefront::AppError;
use tcg_storefront::config::StoreConfig;
use tcg_storefront::store::Preferences;

mod commands;

#[derive(Parser)]
#[command(name = "tcg")]
#[command(author, version, about = "TCG Store local state tools")]
struct Cli {
    /// Preference file (overrides `TCG_STORE_PATH`)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Register(commands::account::RegisterArgs),
    /// Log in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Edit the logged-in user's profile
    Profile(commands::account::ProfileArgs),
    /// Registered users
    Users {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Login attempt log
    Attempts {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Manage the local catalog
    Products {
        #[command(subcommand)]
        action: commands::products::ProductAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
}

#[derive(Subcommand)]
enum ListAction {
    /// List all entries
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        if e.is_internal() {
            tracing::error!("Command failed: {e}");
        }
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = StoreConfig::from_env()?;
    if let Some(path) = cli.store {
        config.store_path = path;
    }
    let prefs = Preferences::open(&config.store_path).await?;

    match cli.command {
        Commands::Register(args) => commands::account::register(prefs, config, args).await?,
        Commands::Login { email, password } => {
            commands::account::login(prefs, config, &email, &password).await?;
        }
        Commands::Logout => commands::account::logout(prefs, config).await?,
        Commands::Whoami => commands::account::whoami(prefs),
        Commands::Profile(args) => commands::account::profile(prefs, config, args).await?,
        Commands::Users {
            action: ListAction::List { json },
        } => commands::account::list_users(prefs, json)?,
        Commands::Attempts {
            action: ListAction::List { json },
        } => commands::account::list_attempts(prefs, json)?,
        Commands::Products { action } => commands::products::run(prefs, &config, action).await?,
        Commands::Cart { action } => commands::cart::run(prefs, action).await?,
    }
    Ok(())
}
