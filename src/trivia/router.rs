use super::handlers;
use super::store::TriviaStore;
use crate::envelope::{envelope_method_not_allowed, not_found};
use crate::server::{cors_layer, health};
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn router(store: TriviaStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/categories", get(handlers::list_categories))
        .route(
            "/categories/:id/questions",
            get(handlers::questions_by_category),
        )
        .route("/questions", get(handlers::list_questions))
        .route("/questions/create", post(handlers::create_question))
        .route("/questions/search", post(handlers::search_questions))
        .route("/questions/:id", delete(handlers::delete_question))
        .route("/quizzes", post(handlers::next_quiz_question))
        .fallback(not_found)
        .layer(middleware::map_response(envelope_method_not_allowed))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}
