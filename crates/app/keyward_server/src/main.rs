//! Keyward API server binary.
//!
//! Loads configuration from the environment (and `.env`), connects the
//! credential store, and serves the login API until Ctrl-C.

use std::sync::Arc;

use clap::Parser;
use keyward_api::config::ApiConfig;
use keyward_api::services::auth::build_authenticator;
use keyward_core::auth::{CredentialStore, InMemoryCredentialStore, PgCredentialStore};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info, warn};

/// CLI arguments. Anything not given here comes from the environment.
#[derive(Parser, Debug)]
#[command(name = "keyward_server", about = "Keyward login API server")]
struct Args {
    /// Address to listen on; overrides `BIND_ADDR`.
    #[arg(long)]
    bind_addr: Option<String>,

    /// PostgreSQL connection URL; overrides `DATABASE_URL`.
    #[arg(long)]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Keep credentials in process memory instead of PostgreSQL.
    ///
    /// Accounts vanish on exit; meant for local development.
    #[arg(long, default_value_t = false)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,keyward_api=debug,keyward_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    // The signing secret is checked before anything else is brought up.
    let mut config =
        ApiConfig::from_env().inspect_err(|e| error!("invalid configuration: {e}"))?;
    if let Some(addr) = args.bind_addr {
        config.bind_addr = addr;
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }
    info!(?config, "starting keyward_server");

    let store: Arc<dyn CredentialStore> = if args.in_memory {
        warn!("using in-memory credential store; accounts are not persisted");
        Arc::new(InMemoryCredentialStore::new())
    } else {
        info!(max_connections = args.max_connections, "configuring connection pool");
        let pool = PgPoolOptions::new()
            .max_connections(args.max_connections)
            .acquire_timeout(config.lookup_timeout)
            .connect(&config.database_url)
            .await?;

        info!("running database migrations");
        keyward_core::migrate::migrate(&pool).await?;

        let store = PgCredentialStore::new(pool);
        info!(users = store.user_count().await?, "credential store ready");
        Arc::new(store)
    };

    let authenticator = build_authenticator(store, &config)?;
    let app = keyward_api::router(keyward_api::AppState {
        authenticator,
        config: config.clone(),
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
