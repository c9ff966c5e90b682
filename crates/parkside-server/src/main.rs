use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use parkside_api::accounts::{self, AppState, AppStateInner};
use parkside_api::contacts;
use parkside_api::listings;
use parkside_api::middleware::{optional_auth, require_auth};
use parkside_api::pages;
use parkside_mailer::HttpMailer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parkside=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("PARKSIDE_JWT_SECRET").unwrap_or_else(|_| "insecure-dev-secret".into());
    let db_path = std::env::var("PARKSIDE_DB_PATH").unwrap_or_else(|_| "parkside.db".into());
    let host = std::env::var("PARKSIDE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PARKSIDE_PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()?;

    // Outbound mail: sender address plus the HTTP mail API it goes through
    // (a local Mailpit by default).
    let mail_sender = std::env::var("PARKSIDE_MAIL_FROM")
        .unwrap_or_else(|_| "noreply@parkside.example".into());
    let mail_endpoint = std::env::var("PARKSIDE_MAIL_API_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8025/api/v1/send".into());
    let mail_token = std::env::var("PARKSIDE_MAIL_API_TOKEN").ok();

    // Init database
    let db = parkside_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let mailer = Arc::new(HttpMailer::new(mail_endpoint, mail_token));
    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        mail_sender,
        mailer,
    });

    // Routes
    let public_routes = Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/listings", get(listings::index))
        .route("/listings/{listing_id}", get(listings::detail))
        .route("/listings/search", get(listings::search))
        .route("/accounts/register", post(accounts::register))
        .route("/accounts/login", post(accounts::login))
        .route("/accounts/logout", get(accounts::logout))
        .with_state(state.clone());

    let contact_routes = Router::new()
        .route("/contacts/contact", post(contacts::submit))
        .layer(middleware::from_fn(optional_auth))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/accounts/dashboard", get(accounts::dashboard))
        .layer(middleware::from_fn(require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(contact_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Parkside server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
