//! pretriaje-api
//!
//! HTTP service for the worker wizard and the clinician review panel.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, patch, post, put};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

pub mod audit;
pub mod config;
pub mod demo;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod submission;

use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/questionnaire", get(routes::questionnaire::get_questionnaire))
        // Worker wizard
        .route("/sessions/start", post(routes::sessions::start_session))
        .route(
            "/sessions/{id}",
            get(routes::sessions::get_session)
                .patch(routes::sessions::update_session)
                .delete(routes::sessions::delete_session),
        )
        .route("/sessions/{id}/submit", post(routes::sessions::submit))
        .route(
            "/sessions/{id}/interactions",
            put(routes::sessions::put_interactions),
        )
        // Campaign administration
        .route(
            "/campaigns/{id}/sessions",
            get(routes::campaigns::list_sessions),
        )
        .route("/campaigns/{id}/queue", get(routes::campaigns::review_queue))
        .route(
            "/campaigns/{id}/qr",
            get(routes::campaigns::get_qr).post(routes::campaigns::rotate_qr),
        )
        // Clinician review
        .route("/reports/{id}", get(routes::reports::get_report))
        .route("/reports/{id}/html", get(routes::reports::get_report_html))
        .route("/reports/{id}/reviews", post(routes::reports::mark_reviewed))
        .route("/reports/{id}/questions", get(routes::review::get_questions))
        .route(
            "/reports/{id}/questions/regenerate",
            post(routes::review::regenerate_questions),
        )
        .route(
            "/reports/{id}/questions/answer",
            post(routes::review::answer_question),
        )
        .route(
            "/reports/{id}/interactions/{index}",
            patch(routes::review::edit_interaction),
        )
        .route("/demo/seed", post(routes::demo::seed))
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(axum_mw::from_fn(middleware::request_log::request_log)),
        )
        .with_state(state)
}
