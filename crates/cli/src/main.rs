//! Banca CLI - banking operations from the command line
//!
//! Usage:
//! ```bash
//! banca init
//! banca register "Ana Gómez" ana@correo.com password1
//! banca login ana@correo.com password1
//! banca verify-otp <LOGIN_TOKEN> 123456
//! export BANCA_TOKEN=<ACCESS_TOKEN>
//! banca product create "Cuenta de ahorros" --alias Ahorros
//! banca product deposit <PRODUCT_ID> 500000 --description "Nómina"
//! banca product transactions <PRODUCT_ID> --limit 10
//! ```

use anyhow::Result;
use banca_business::BankConfig;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;
mod db;

use commands::{auth, product};

/// Banca - digital banking backend with two-step login
#[derive(Parser)]
#[command(name = "banca")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:data/banca.db", global = true)]
    pub database_url: String,

    /// Secret used to sign access tokens
    #[arg(long, env = "JWT_SECRET", global = true, hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Access token from `verify-otp`
    #[arg(long, env = "BANCA_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and apply migrations
    Init,

    /// Show record counts
    Status,

    /// Delete pending sessions that already expired
    PurgeSessions,

    /// Register a new client and print the authenticator enrollment
    Register {
        full_name: String,
        email: String,
        password: String,
    },

    /// Password step of the login; prints a login token
    Login { email: String, password: String },

    /// Code step of the login; prints an access token
    VerifyOtp {
        login_token: String,
        /// 6-digit code from the authenticator app
        code: String,
    },

    /// Show the authenticated client
    Profile,

    /// Print the current code for a base32 secret (development helper)
    OtpCode { secret: String },

    /// Product operations for the authenticated client
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
pub enum ProductAction {
    /// Open a new product
    Create {
        /// Free-form product type, e.g. "Cuenta de ahorros"
        product_type: String,
        #[arg(long)]
        alias: Option<String>,
        /// ISO currency code (default COP)
        #[arg(long)]
        currency: Option<String>,
    },
    /// List owned products, newest first
    List,
    /// Show one product
    Show { product_id: String },
    /// Deposit into a product
    Deposit {
        product_id: String,
        amount: Decimal,
        #[arg(long)]
        description: Option<String>,
    },
    /// Withdraw from a product
    Withdraw {
        product_id: String,
        amount: Decimal,
        #[arg(long)]
        description: Option<String>,
    },
    /// Latest transactions of a product
    Transactions {
        product_id: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Compare the balance with the sum of the product's transactions
    Verify { product_id: String },
}

impl Cli {
    fn config(&self) -> BankConfig {
        let config = BankConfig::from_env();
        match &self.jwt_secret {
            Some(secret) => config.with_jwt_secret(secret.clone()),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    match cli.command {
        Commands::Init => {
            db::init_database(&cli.database_url).await?;
            println!("✅ Database initialized at {}", cli.database_url);
        }

        Commands::Status => {
            db::show_status(&cli.database_url).await?;
        }

        Commands::PurgeSessions => {
            db::purge_sessions(&cli.database_url).await?;
        }

        Commands::OtpCode { secret } => {
            auth::otp_code(&config, &secret)?;
        }

        Commands::Register {
            full_name,
            email,
            password,
        } => {
            let ctx = db::context(&cli.database_url, config).await?;
            auth::register(&ctx, &full_name, &email, &password).await?;
            ctx.database().close().await;
        }

        Commands::Login { email, password } => {
            let ctx = db::context(&cli.database_url, config).await?;
            auth::login(&ctx, &email, &password).await?;
            ctx.database().close().await;
        }

        Commands::VerifyOtp { login_token, code } => {
            let ctx = db::context(&cli.database_url, config).await?;
            auth::verify_otp(&ctx, &login_token, &code).await?;
            ctx.database().close().await;
        }

        Commands::Profile => {
            let ctx = db::context(&cli.database_url, config).await?;
            auth::profile(&ctx, cli.token.as_deref()).await?;
            ctx.database().close().await;
        }

        Commands::Product { action } => {
            let ctx = db::context(&cli.database_url, config).await?;
            product::handle(&ctx, cli.token.as_deref(), action).await?;
            ctx.database().close().await;
        }
    }

    Ok(())
}
