use super::handlers;
use super::state::CoffeeApp;
use crate::envelope::{envelope_method_not_allowed, not_found};
use crate::server::{cors_layer, health};
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn router(app: CoffeeApp) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/drinks",
            get(handlers::list_drinks).post(handlers::create_drink),
        )
        .route("/drinks-detail", get(handlers::drinks_detail))
        .route(
            "/drinks/:id",
            patch(handlers::update_drink).delete(handlers::delete_drink),
        )
        .route("/baristas", get(handlers::list_baristas))
        .route(
            "/baristas/:user_id",
            post(handlers::add_barista).delete(handlers::remove_barista),
        )
        .route("/managers", get(handlers::list_managers))
        .route("/managers/:user_id/add", post(handlers::add_manager))
        .route("/managers/:user_id", delete(handlers::remove_manager))
        .fallback(not_found)
        .layer(middleware::map_response(envelope_method_not_allowed))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}
