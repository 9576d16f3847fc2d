//! HTTP surface of the client records service.
//!
//! Routes are nested under `/api/clients`:
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /`, `GET /` | create / list clients |
//! | `GET`, `PUT`, `DELETE /:id` | one client with its anamnesis |
//! | `POST`, `GET /:id/photos` | upload / list a client's photos |
//! | `DELETE /photos/:id` | remove one photo |
//! | `GET /photos/:id/image` | raw photo bytes |

mod clients;
mod error;
mod extract;
mod photos;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db::Database;

/// Upper bound for a photo upload body (ten photos plus multipart overhead)
const UPLOAD_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Build the service router. Path params use `:param` syntax (axum 0.7).
pub fn router(db: Database) -> Router {
    let routes = Router::new()
        .route("/", post(clients::create).get(clients::list))
        .route(
            "/:id",
            get(clients::detail)
                .put(clients::update)
                .delete(clients::remove),
        )
        .route(
            "/:id/photos",
            post(photos::upload)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
                .get(photos::list),
        )
        .route("/photos/:id", delete(photos::remove))
        .route("/photos/:id/image", get(photos::image))
        .with_state(AppState { db });

    Router::new()
        .nest("/api/clients", routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
