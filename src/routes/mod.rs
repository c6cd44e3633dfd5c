pub mod blob;
pub mod delete;
pub mod files;
pub mod health;
pub mod upload;
pub mod validation;

pub use blob::serve_blob;
pub use delete::delete_file;
pub use files::list_files;
pub use health::health_check;
pub use upload::upload_file;
pub use validation::validate_origin;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::AppState;

/// Build the application router
///
/// Uploads carry no transport body limit: the handler streams the file,
/// buffering at most the configured ceiling, so an oversized body with a
/// bad password is still answered with `Unauthorized`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/upload",
            post(upload_file).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/files", get(list_files))
        .route("/api/delete", delete(delete_file))
        .route("/blob/*pathname", get(serve_blob))
        .with_state(state)
}
