use std::sync::Arc;

use auth::TokenIssuer;
use library_service::book::service::BookService;
use library_service::config::Config;
use library_service::config::StorageBackend;
use library_service::inbound::http::router::create_router;
use library_service::inbound::http::router::AppState;
use library_service::repositories::InMemoryBookRepository;
use library_service::repositories::InMemoryUserRepository;
use library_service::repositories::PostgresBookRepository;
use library_service::repositories::PostgresUserRepository;
use library_service::user::service::UserService;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "library-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage = ?config.storage.backend,
        isbn_length = config.catalog.isbn_length,
        "Configuration loaded"
    );

    let token_issuer =
        Arc::new(TokenIssuer::new(config.jwt.secret.as_bytes()).with_lifetimes(config.jwt.lifetimes()));

    let state = match config.storage.backend {
        StorageBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let users = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
            let books = Arc::new(PostgresBookRepository::new(pg_pool));

            AppState {
                user_service: Arc::new(UserService::new(Arc::clone(&users))),
                book_service: Arc::new(BookService::new(books, users)),
                token_issuer,
                isbn_length: config.catalog.isbn_length,
            }
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, records are lost on shutdown");

            let users = Arc::new(InMemoryUserRepository::new());
            let books = Arc::new(InMemoryBookRepository::new());

            AppState {
                user_service: Arc::new(UserService::new(Arc::clone(&users))),
                book_service: Arc::new(BookService::new(books, users)),
                token_issuer,
                isbn_length: config.catalog.isbn_length,
            }
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state, config.server.request_timeout());

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
