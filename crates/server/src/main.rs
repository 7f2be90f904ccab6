use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use helpdesk_core::{
    load_config, validate_config, Authenticator, EquipmentStore, HelpdeskService,
    SessionAuthenticator, SessionStore, SqliteEquipmentStore, SqliteSessionStore,
    SqliteTicketStore, SqliteUserStore, TicketStore, UserStore,
};
use helpdesk_server::api::create_router;
use helpdesk_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("HELPDESK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!("Demo identity: {}", config.auth.demo_user_id);

    let db_path = &config.database.path;

    let user_store: Arc<dyn UserStore> =
        Arc::new(SqliteUserStore::new(db_path).context("Failed to create user store")?);
    let ticket_store: Arc<dyn TicketStore> =
        Arc::new(SqliteTicketStore::new(db_path).context("Failed to create ticket store")?);
    let equipment_store: Arc<dyn EquipmentStore> = Arc::new(
        SqliteEquipmentStore::new(db_path).context("Failed to create equipment store")?,
    );

    let session_ttl = chrono::Duration::minutes(i64::from(config.auth.session_ttl_minutes));
    let session_store: Arc<dyn SessionStore> = Arc::new(
        SqliteSessionStore::new(db_path, session_ttl).context("Failed to create session store")?,
    );
    let purged = session_store
        .purge_expired()
        .context("Failed to purge expired sessions")?;
    info!("Stores initialized ({} expired sessions purged)", purged);

    let service = HelpdeskService::new(user_store, ticket_store, equipment_store);
    let seeded = service
        .seed_users(&config.users)
        .context("Failed to seed users")?;
    if seeded > 0 {
        info!("Seeded {} user profiles", seeded);
    }

    let authenticator: Arc<dyn Authenticator> =
        Arc::new(SessionAuthenticator::new(Arc::clone(&session_store)));
    info!("Using authenticator: {}", authenticator.method_name());

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(
        config,
        authenticator,
        session_store,
        service,
    ));

    let app = create_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
