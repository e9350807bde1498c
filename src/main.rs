use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use czaplisko::auth::password::hash_password;
use czaplisko::config::{AppConfig, ConfigArgs};
use czaplisko::server::{self, MigrateDirection};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true, env = "LOG_LEVEL")]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve {
        #[clap(short, long, env = "PORT", default_value = "3000")]
        port: u16,
        #[clap(long, env = "CORS_ORIGIN")]
        cors_origin: Option<String>,
        /// Fill empty tables with the default content in the background.
        #[clap(long, env = "SEED_ON_START", default_value_t = true, action = ArgAction::Set)]
        seed_on_start: bool,
        #[clap(flatten)]
        config: ConfigArgs,
    },
    Migrate {
        #[clap(subcommand)]
        direction: MigrateDirection,
        #[clap(long, env = "DATABASE_URL", global = true)]
        database_url: Option<String>,
    },
    /// Fill empty tables with the default content once.
    Seed {
        #[clap(long, env = "DATABASE_URL")]
        database_url: String,
    },
    /// Print a bcrypt hash for ADMIN_PASSWORD_HASH.
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Serve {
            port,
            cors_origin,
            seed_on_start,
            config,
        } => {
            let config = AppConfig::from_args(config)?;
            info!("Starting server on port {}", port);
            server::start_server(port, config, cors_origin.as_deref(), seed_on_start).await?;
        }
        Commands::Migrate {
            direction,
            database_url,
        } => {
            let database_url =
                database_url.ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required"))?;
            info!("Running database migration: {:?}", direction);
            server::migrate_database(&database_url, direction).await?;
        }
        Commands::Seed { database_url } => {
            server::seed_database(&database_url).await?;
        }
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_deref()
        .unwrap_or("info")
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_string()))
        .init();
}
