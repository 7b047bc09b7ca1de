use crate::handlers;
use crate::state::AppState;
use crate::static_files::serve_bundle;
use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard_page))
        .route(
            "/settings",
            get(handlers::settings_page).post(handlers::save_settings),
        )
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/goals", get(handlers::get_goals))
        .route("/api/goals/:year", put(handlers::put_goals))
        .route("/api/goals/edit", post(handlers::edit_goals))
        .fallback(serve_bundle)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
