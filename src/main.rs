use clap::Parser;
use tracing_subscriber::EnvFilter;

use alerte_compteur::cli::{self, Cli};

const DEFAULT_LOG_FILTER: &str = "alerte_compteur=debug,tower_http=debug,sqlx=warn";

#[tokio::main]
async fn main() {
    // Load .env if present so DATABASE_URL, SECRET_KEY, etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}
