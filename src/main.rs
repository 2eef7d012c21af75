use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use mywallet::cli::{
    handle_add, handle_balance, handle_delete, handle_list, handle_login, handle_logout, AddArgs,
    CliContext,
};
use mywallet::config::{AuthFailurePolicy, Settings, WalletPaths};
use mywallet::services::SessionService;
use mywallet::WalletResult;

#[derive(Parser)]
#[command(
    name = "mywallet",
    version,
    about = "Personal income and expense ledger",
    long_about = "MyWallet keeps a ledger of income and expense movements with a \
                  running balance and a summary of the current month. It works \
                  offline from a local cache, or against a wallet API when logged in."
)]
struct Cli {
    /// Work from the local cache only
    #[arg(long, global = true, env = "MYWALLET_OFFLINE")]
    offline: bool,

    /// Wallet API base URL (overrides the settings file)
    #[arg(long, global = true, env = "MYWALLET_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the wallet API
    Login {
        /// Account e-mail
        #[arg(short, long)]
        email: String,
        /// Password; prompted for when missing
        #[arg(long, env = "MYWALLET_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the saved session
    Logout,

    /// Show the ledger with the balance and monthly summary
    #[command(alias = "ls")]
    List {
        /// Only show the most recent movements
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Record an income or expense
    Add(AddArgs),

    /// Delete a movement
    #[command(alias = "rm")]
    Delete {
        /// Movement ID or a unique prefix of it
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show the total balance and a monthly summary
    Balance {
        /// Month to summarize (YYYY-MM), defaults to the current one
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show current configuration and paths
    Config {
        /// Write the effective settings (including --api-url) to the settings file
        #[arg(long)]
        save: bool,
    },
}

/// Send tracing output to a daily rolling file under the data directory
///
/// `RUST_LOG` overrides the default filter.
fn init_logging(paths: &WalletPaths) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = paths.log_dir();
    std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "mywallet.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mywallet=info".into()),
        )
        .init();

    Ok(())
}

fn run(ctx: &CliContext, command: Commands) -> WalletResult<()> {
    match command {
        Commands::Login { email, password } => handle_login(ctx, &email, password),
        Commands::Logout => handle_logout(ctx),
        Commands::List { limit } => handle_list(ctx, limit),
        Commands::Add(args) => handle_add(ctx, args),
        Commands::Delete { id, force } => handle_delete(ctx, &id, force),
        Commands::Balance { month } => handle_balance(ctx, month.as_deref()),
        Commands::Config { save } => {
            if save {
                ctx.settings.save(&ctx.paths)?;
                println!("Saved settings to {}", ctx.paths.settings_file().display());
                println!();
            }
            show_config(ctx);
            Ok(())
        }
    }
}

fn show_config(ctx: &CliContext) {
    let settings = &ctx.settings;
    println!("MyWallet Configuration");
    println!("======================");
    println!("Data directory:  {}", ctx.paths.base_dir().display());
    println!("Cache directory: {}", ctx.paths.cache_dir().display());
    println!("Log directory:   {}", ctx.paths.log_dir().display());
    println!("Settings file:   {}", ctx.paths.settings_file().display());
    println!();
    println!("Settings:");
    match ctx.remote_base() {
        Some(url) => println!("  Mode:            remote ({})", url),
        None => println!("  Mode:            local"),
    }
    println!("  Request timeout: {}s", settings.request_timeout_secs);
    println!("  On auth failure: {:?}", settings.auth_failure);
    println!("  Currency symbol: {}", settings.currency_symbol);
    println!("  Date format:     {}", settings.date_format);
}

/// Drop a session the remote no longer accepts
fn forget_rejected_session(ctx: &CliContext) -> WalletResult<bool> {
    let cache = ctx.cache();
    let service = SessionService::new(&cache);
    if service.restore()?.is_none() {
        return Ok(false);
    }
    service.logout()?;
    Ok(true)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = WalletPaths::new()?;
    paths.ensure_directories()?;
    let mut settings = Settings::load_or_create(&paths)?;
    if let Some(url) = cli.api_url {
        settings.api_url = Some(url);
    }

    init_logging(&paths)?;
    info!(offline = cli.offline, "Starting mywallet");

    let ctx = CliContext::new(paths, settings, cli.offline);

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("MyWallet - personal income and expense ledger");
            println!();
            println!("Run 'mywallet --help' for usage information.");
            println!("Run 'mywallet list' to see your ledger.");
            return Ok(());
        }
    };

    // A rejected login says nothing about the session already saved
    let forces_logout = ctx.settings.auth_failure == AuthFailurePolicy::Logout
        && !matches!(command, Commands::Login { .. });

    match run(&ctx, command) {
        Ok(()) => Ok(()),
        Err(err) if err.is_unauthorized() && forces_logout => {
            if forget_rejected_session(&ctx)? {
                warn!("Remote rejected the saved session; logged out");
                eprintln!("Your session is no longer valid and you have been logged out.");
            }
            eprintln!("Run 'mywallet login' to sign in.");
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
