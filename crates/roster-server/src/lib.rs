pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API and view routes.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    router(state::AppState::load(root))
}

/// Same as [`build_router`] with an already assembled state.
pub fn router(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Employees
        .route(
            "/api/employees",
            get(routes::employees::list_employees).post(routes::employees::add_employee),
        )
        .route(
            "/api/employees/{id}",
            get(routes::employees::get_employee)
                .put(routes::employees::update_employee)
                .delete(routes::employees::delete_employee),
        )
        // Form sessions
        .route("/api/forms", post(routes::forms::open_form))
        .route(
            "/api/forms/{sid}",
            get(routes::forms::get_form).delete(routes::forms::close_form),
        )
        .route(
            "/api/forms/{sid}/values",
            axum::routing::patch(routes::forms::set_value),
        )
        .route("/api/forms/{sid}/touch", post(routes::forms::touch))
        .route("/api/forms/{sid}/skills", post(routes::forms::add_skill))
        .route(
            "/api/forms/{sid}/skills/{index}",
            axum::routing::delete(routes::forms::remove_skill),
        )
        .route("/api/forms/{sid}/submit", post(routes::forms::submit))
        // Views
        .route("/", get(routes::views::view))
        .route("/home", get(routes::views::view))
        .route("/list", get(routes::views::view))
        .route("/create", get(routes::views::view))
        .route("/edit/{id}", get(routes::views::view))
        .route("/delete/{id}", get(routes::views::view))
        .fallback(routes::views::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the roster HTTP server.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener, open_browser).await
}

/// Start the roster HTTP server on a pre-bound listener.
///
/// Lets the caller read the actual port first (useful when `port = 0` and
/// the OS picks a free one).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("roster server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/home");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
