use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;
use uuid::Uuid;

use crate::actions;
use crate::db::DbPool;
use crate::track_archive::TrackArchive;
use crate::uploads::UploadStore;

/// Shared state handed to every handler. Repositories are built
/// per-request from the pool; the archive and upload store are plain
/// path wrappers.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub archive: TrackArchive,
    pub uploads: UploadStore,
}

// Middleware for request logging with correlation ID
async fn request_logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4().to_string()[..8].to_string();
    let start_time = Instant::now();

    info!("Started {} {} [{}]", method, path, request_id);

    let response = next.run(request).await;
    let duration = start_time.elapsed();
    let status = response.status();

    info!(
        "Completed {} {} [{}] {} in {:.2}ms",
        method,
        path,
        request_id,
        status.as_u16(),
        duration.as_secs_f64() * 1000.0
    );

    response
}

pub fn build_router(state: AppState) -> Router {
    let uploads_dir = state.uploads.root().to_path_buf();

    Router::new()
        // Vessel registry
        .route("/registry", get(actions::list_registry))
        .route("/registry/ports", get(actions::port_facets))
        .route("/registry/business-types", get(actions::business_type_facets))
        .route("/registry/groups", get(actions::group_facets))
        .route("/registry/organizations", get(actions::organization_facets))
        .route("/registry/status", get(actions::registry_status))
        .route("/registry/upload", post(actions::upload_census))
        .route("/registry/{id}", get(actions::get_registry_record))
        .route("/registry/{id}", put(actions::update_registry_record))
        // Memos and attachments
        .route("/registry/{id}/memos", get(actions::list_memos))
        .route("/registry/{id}/memos", post(actions::create_memo))
        .route("/registry/{id}/memos/{memo_id}", put(actions::update_memo))
        .route(
            "/registry/{id}/memos/{memo_id}",
            delete(actions::delete_memo),
        )
        .route("/registry/{id}/photos", get(actions::list_photos))
        .route("/registry/{id}/photos", post(actions::upload_photo))
        .route(
            "/registry/{id}/photos/{photo_id}",
            delete(actions::delete_photo),
        )
        .route(
            "/registry/{id}/photos/{photo_id}/primary",
            put(actions::set_primary_photo),
        )
        .route("/registry/{id}/files", get(actions::list_files))
        .route("/registry/{id}/files", post(actions::upload_file))
        .route(
            "/registry/{id}/files/{file_id}",
            delete(actions::delete_file),
        )
        // Voyage ledger
        .route("/voyages", get(actions::list_voyages))
        .route("/voyages/monthly", post(actions::create_monthly_voyage))
        .route("/voyages/{id}", get(actions::get_voyage))
        .route("/voyages/{id}", put(actions::update_voyage))
        .route(
            "/voyages/{id}/track-points",
            post(actions::append_track_points),
        )
        // Sales and expenses
        .route("/auctions", get(actions::list_auctions))
        .route("/auctions", post(actions::create_auction))
        .route("/auctions/{id}", delete(actions::delete_auction))
        .route("/private-sales", get(actions::list_private_sales))
        .route("/private-sales", post(actions::create_private_sale))
        .route("/private-sales/{id}", delete(actions::delete_private_sale))
        .route("/expenses", get(actions::list_expenses))
        .route("/expenses", post(actions::create_expense))
        .route("/expenses/{id}", delete(actions::delete_expense))
        // Track archive
        .route("/tracks/{mmsi}", get(actions::list_tracks))
        .route("/tracks/{mmsi}/years", get(actions::list_track_years))
        .route("/tracks/{mmsi}/{year}/months", get(actions::list_track_months))
        .route(
            "/tracks/{mmsi}/html/{filename}",
            get(actions::get_track_document),
        )
        // Dashboard
        .route("/statistics", get(actions::get_statistics))
        // Stored uploads, served back by name
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .with_state(state)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received");
}

pub async fn start_web_server(interface: String, port: u16, state: AppState) -> Result<()> {
    info!("Starting web server on {}:{}", interface, port);

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{interface}:{port}")).await?;
    info!("Web server listening on http://{}:{}", interface, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
