//! Local web server for the school psychology office.
//!
//! Serves the gated dashboard and the JSON API for attention records,
//! appointments, reminders and the student lookup, plus PDF export.

mod config;
mod error;
mod gate;
mod routes;
mod state;

use database::Database;
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting office web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    if config.seed_demo {
        let today = chrono::Local::now().date_naive();
        if database::seed::seed_demo_data(db.pool(), today).await? {
            info!(
                email = database::seed::DEMO_PSYCHOLOGIST_EMAIL,
                "Demo data seeded"
            );
        }
    }

    let pruned = database::session::prune_expired(db.pool()).await?;
    if pruned > 0 {
        info!(pruned, "Removed expired sessions");
    }

    // Build application state
    let state = AppState::new(db, config.portal_url, config.session_ttl);

    // Build router
    let app = routes::router(&state)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Office web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
