//! Campusnet - login client for DrCOM campus network portals
//!
//! Authenticates a student account against the campus captive portal and
//! optionally remembers the credentials in a local store.

mod config;
mod http;
mod models;
mod parser;
mod portal;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use models::LoginForm;
use portal::{DrcomPortal, Portal};
use store::{CredentialStore, FileStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "campusnet")]
#[command(about = "Campus Network Login Client", long_about = None)]
struct Args {
    /// Config file path (default: config.toml)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate against the campus portal (default)
    Login {
        /// Student account id (falls back to the stored one)
        #[arg(short, long)]
        account: Option<String>,

        /// Password (falls back to the stored one)
        #[arg(short, long)]
        password: Option<String>,

        /// Remember the credentials from now on
        #[arg(long, conflicts_with = "no_remember")]
        remember: bool,

        /// Stop remembering before this attempt
        #[arg(long)]
        no_remember: bool,
    },

    /// Turn credential remembering on or off
    Remember {
        #[arg(value_enum)]
        state: Toggle,

        /// Account id to remember right away
        #[arg(short, long)]
        account: Option<String>,

        /// Password to remember right away
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget stored credentials
    Forget,

    /// Show what is currently stored
    Status,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Toggle {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let cfg = config::Config::load(args.config.as_deref())?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level)),
        )
        .init();

    let store = FileStore::open_default()?;

    match args.command.unwrap_or(Command::Login {
        account: None,
        password: None,
        remember: false,
        no_remember: false,
    }) {
        Command::Login {
            account,
            password,
            remember,
            no_remember,
        } => {
            let toggle = if remember {
                Some(true)
            } else if no_remember {
                Some(false)
            } else {
                None
            };
            run_login(&cfg, &store, account, password, toggle).await
        }
        Command::Remember {
            state,
            account,
            password,
        } => run_remember(&store, state, account, password),
        Command::Forget => {
            store.clear()?;
            tracing::info!("Stored credentials cleared");
            Ok(())
        }
        Command::Status => run_status(&store),
    }
}

/// One full login attempt: reconcile, validate, authenticate, persist
async fn run_login(
    cfg: &config::Config,
    store: &dyn CredentialStore,
    account: Option<String>,
    password: Option<String>,
    remember_toggle: Option<bool>,
) -> Result<()> {
    let stored = store.read()?;
    let mut form = store::reconcile(
        LoginForm {
            account: account.unwrap_or_default(),
            password: password.unwrap_or_default(),
            remember: stored.remember,
        },
        &stored,
    );

    // An explicit flag acts like the remember checkbox: applied immediately,
    // before the attempt
    if let Some(remember) = remember_toggle {
        form.remember = remember;
        store::apply_remember_toggle(store, &form, remember)?;
    }

    if form.account.trim().is_empty() {
        anyhow::bail!("please enter your student id");
    }
    if form.password.trim().is_empty() {
        anyhow::bail!("please enter your password");
    }

    let portal = DrcomPortal::new(cfg)?;
    tracing::info!("Using portal: {}", portal.name());
    tracing::info!("Logging in to {} as {}", cfg.server.base_url, form.account);

    let outcome = portal.login(&form.account, &form.password).await;
    store::persist_outcome(store, outcome.is_ok(), &form)?;

    match outcome {
        Ok(payload) => {
            tracing::info!("Login successful");
            if let Some(ip) = payload.v46ip.as_deref() {
                tracing::info!("Assigned address: {}", ip);
            }
            if let Some(uid) = payload.uid.as_deref() {
                tracing::debug!("Session uid: {}", uid);
            }
            Ok(())
        }
        Err(failure) => {
            tracing::error!("{}", failure);
            Err(failure.into())
        }
    }
}

/// Standalone remember toggle, no login attempt involved
fn run_remember(
    store: &dyn CredentialStore,
    state: Toggle,
    account: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let stored = store.read()?;
    let form = store::reconcile(
        LoginForm {
            account: account.unwrap_or_default(),
            password: password.unwrap_or_default(),
            remember: stored.remember,
        },
        &stored,
    );

    match state {
        Toggle::On => {
            store::apply_remember_toggle(store, &form, true)?;
            tracing::info!("Credentials will be remembered");
        }
        Toggle::Off => {
            store::apply_remember_toggle(store, &form, false)?;
            tracing::info!("Remember flag turned off, stored credentials kept");
        }
    }
    Ok(())
}

fn run_status(store: &dyn CredentialStore) -> Result<()> {
    let stored = store.read()?;

    let account = if stored.account.is_empty() {
        "(none)"
    } else {
        stored.account.as_str()
    };
    let password = if stored.password.is_empty() {
        "(not stored)"
    } else {
        "(stored)"
    };

    println!("account:  {}", account);
    println!("password: {}", password);
    println!("remember: {}", stored.remember);
    Ok(())
}
