//! `HomeoWare` CLI - Registration, stock, and advisor tools against the remote API.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password read from stdin or HW_PASSWORD) and print a token
//! hw-cli login -e ana@farm.example --print-token
//!
//! # Use the token for later calls
//! export HW_TOKEN=...
//!
//! # Register a user
//! hw-cli users create --name "Ana" --email ana@farm.example --role administrator --password secret1
//!
//! # Stock list, filtered and sorted
//! hw-cli products list --query vermífugo --sort quantity-desc
//!
//! # Ask the advisor, or start an interactive chat without a question
//! hw-cli chat "What can I use when my steer has ticks?"
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `forgot-password` / `reset-password` - Account flows
//! - `users` / `clients` / `companies` / `products` - List, create, edit, delete
//! - `chat` - Livestock advisor
//!
//! # Environment Variables
//!
//! - `API_URL` - Base URL of the remote API (required)
//! - `HW_TOKEN` - Bearer token from a previous `login --print-token`
//! - `GEMINI_API_KEY` - Enables Gemini answers in `chat`
//! - `SENTRY_DSN` - Error tracking (optional)
//! - `LOG_FORMAT=json` - Structured log output

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use homeoware_admin::AdminConfig;
use homeoware_core::SortKey;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::records::{ClientFields, CompanyFields, ProductFields, UserFields};

#[derive(Parser)]
#[command(name = "hw-cli")]
#[command(author, version, about = "HomeoWare admin CLI")]
struct Cli {
    /// Bearer token of a signed-in session
    #[arg(long, env = "HW_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        /// Password; read from stdin when omitted
        #[arg(long, env = "HW_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Print the session token for use as `HW_TOKEN`
        #[arg(long)]
        print_token: bool,
    },
    /// Drop the current session
    Logout,
    /// Send a password reset link
    ForgotPassword {
        #[arg(short, long)]
        email: String,
    },
    /// Choose a new password with the token from a reset link
    ResetPassword {
        #[arg(short, long)]
        email: String,

        #[arg(long)]
        token: String,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: RecordAction<UserFields>,
    },
    /// Manage clients
    Clients {
        #[command(subcommand)]
        action: RecordAction<ClientFields>,
    },
    /// Manage companies
    Companies {
        #[command(subcommand)]
        action: RecordAction<CompanyFields>,
    },
    /// Manage stock products
    Products {
        #[command(subcommand)]
        action: RecordAction<ProductFields>,
    },
    /// Ask the livestock advisor
    Chat {
        /// Single question; starts an interactive chat when omitted
        question: Option<String>,
    },
}

#[derive(Subcommand)]
enum RecordAction<F: clap::Args> {
    /// List records
    List {
        /// Case-insensitive text filter
        #[arg(short, long, default_value = "")]
        query: String,

        /// Sort order (`quantity-asc`, `quantity-desc`, `created-asc`, `created-desc`); products only
        #[arg(short, long)]
        sort: Option<SortKey>,
    },
    /// Create a record
    Create {
        #[command(flatten)]
        fields: F,
    },
    /// Edit a record; unset fields keep their current value
    Edit {
        id: String,

        #[command(flatten)]
        fields: F,
    },
    /// Delete a record (users and products only)
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
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

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "homeoware_admin=info,homeoware_cli=info".into());

    let is_json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    // Logs go to stderr; stdout carries command output
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads HW_TOKEN and friends
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match AdminConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        // exit() skips destructors; flush Sentry first
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: AdminConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::new(&config, cli.token).await;

    match cli.command {
        Commands::Login {
            email,
            password,
            print_token,
        } => commands::account::login(&ctx, &email, password, print_token).await?,
        Commands::Logout => commands::account::logout(&ctx).await,
        Commands::ForgotPassword { email } => {
            commands::account::forgot_password(&ctx, &email).await?;
        }
        Commands::ResetPassword { email, token } => {
            commands::account::reset_password(&ctx, &email, &token).await?;
        }
        Commands::Users { action } => records(&ctx, action).await?,
        Commands::Clients { action } => records(&ctx, action).await?,
        Commands::Companies { action } => records(&ctx, action).await?,
        Commands::Products { action } => records(&ctx, action).await?,
        Commands::Chat { question } => commands::chat::run(&config, question).await?,
    }

    ctx.warn_if_expired();
    Ok(())
}

async fn records<F>(
    ctx: &commands::Context,
    action: RecordAction<F>,
) -> Result<(), commands::CommandError>
where
    F: commands::records::KindFields + clap::Args,
{
    use commands::records;

    match action {
        RecordAction::List { query, sort } => records::list::<F>(ctx, &query, sort).await,
        RecordAction::Create { fields } => records::create(ctx, &fields).await,
        RecordAction::Edit { id, fields } => records::edit(ctx, &id.into(), &fields).await,
        RecordAction::Delete { id, yes } => records::delete::<F>(ctx, &id.into(), yes).await,
    }
}
