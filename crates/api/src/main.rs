use std::net::SocketAddr;
use std::sync::Arc;

use edutube_ai::{OpenAiProvider, ProviderConfig};
use edutube_api::config::ServerConfig;
use edutube_api::notifications::{MailerConfig, NoopNotifier, Notifier, SmtpNotifier};
use edutube_api::router::build_app_router;
use edutube_api::state::AppState;
use edutube_pipeline::EnrichmentPipeline;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edutube_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = edutube_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    edutube_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    edutube_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- AI provider and enrichment pipeline ---
    let provider = Arc::new(OpenAiProvider::new(ProviderConfig::from_env()));
    let pipeline = EnrichmentPipeline::new(pool.clone(), provider);
    tracing::info!("Enrichment pipeline ready");

    // --- Email notifier ---
    let notifier: Arc<dyn Notifier> = match MailerConfig::from_env() {
        Some(mailer_config) => {
            tracing::info!(host = %mailer_config.host, "SMTP notifier configured");
            Arc::new(SmtpNotifier::new(mailer_config))
        }
        None => {
            tracing::info!("EMAIL_HOST not set, notification emails disabled");
            Arc::new(NoopNotifier)
        }
    };

    // --- App state and router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pipeline,
        notifier,
    };
    let app = build_app_router(state, &config);

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

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
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
