use std::net::SocketAddr;
use std::sync::Arc;

use draftpost_api::config::ServerConfig;
use draftpost_api::media::FsMediaLibrary;
use draftpost_api::remote::HttpFetcher;
use draftpost_api::router::build_app_router;
use draftpost_api::services::{ImageImporter, PostCreator};
use draftpost_api::state::AppState;
use draftpost_core::ports::ContentStore;
use draftpost_db::PgContentStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "draftpost_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        media_root = %config.media_root.display(),
        remote_timeout_secs = config.remote_timeout_secs,
        delete_draft_on_image_failure = config.delete_draft_on_image_failure,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = draftpost_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    draftpost_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    draftpost_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Media library ---
    tokio::fs::create_dir_all(config.incoming_dir())
        .await
        .expect("Failed to create media directories");

    // --- Create-post flow ---
    let content_store: Arc<dyn ContentStore> = Arc::new(PgContentStore::new(pool.clone()));
    let fetcher = Arc::new(
        HttpFetcher::new(
            config.remote_timeout(),
            config.incoming_dir(),
            config.max_image_bytes,
        )
        .expect("Failed to build HTTP client"),
    );
    let library = Arc::new(FsMediaLibrary::new(config.media_root.clone(), pool));
    let importer = Arc::new(ImageImporter::new(fetcher.clone(), library));
    let post_creator = PostCreator::new(Arc::clone(&content_store), fetcher, importer)
        .with_draft_cleanup(config.delete_draft_on_image_failure);

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        content_store,
        post_creator: Arc::new(post_creator),
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

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
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
