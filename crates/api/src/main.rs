use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use brieflink_api::config::ServerConfig;
use brieflink_api::router::build_app_router;
use brieflink_api::state::AppState;
use brieflink_db::store::{PgStore, RecordStore};
use brieflink_events::{DispatcherConfig, EmailConfig, Mailer, NotificationDispatcher, SmtpMailer};
use brieflink_workflow::WorkflowContext;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "brieflink_api=debug,brieflink_workflow=debug,brieflink_events=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = brieflink_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    brieflink_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    brieflink_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let store: Arc<dyn RecordStore> = Arc::new(PgStore::new(pool));

    // --- Email ---
    let mailer: Option<Arc<dyn Mailer>> = match EmailConfig::from_env() {
        Some(email_config) => {
            let mailer = SmtpMailer::new(email_config).expect("Invalid SMTP configuration");
            tracing::info!("SMTP email delivery enabled");
            Some(Arc::new(mailer) as Arc<dyn Mailer>)
        }
        None => {
            tracing::info!("SMTP_HOST not set, email delivery disabled");
            None
        }
    };

    // --- Notifications ---
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::clone(&store),
        mailer,
        DispatcherConfig {
            delivery_timeout: Duration::from_secs(config.notification_timeout_secs),
            public_base_url: config.public_base_url.clone(),
        },
    ));

    // --- App state ---
    let state = AppState {
        workflow: WorkflowContext::new(store, Arc::clone(&dispatcher)),
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state).expect("Invalid CORS configuration");

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!(
        in_flight = dispatcher.in_flight(),
        "Server stopped accepting connections, draining notifications"
    );
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    if dispatcher.shutdown(grace).await {
        tracing::info!("Graceful shutdown complete");
    }
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
