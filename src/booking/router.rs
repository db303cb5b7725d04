use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::*;
use super::store::BookingStore;
use crate::server::health;

pub fn router(store: BookingStore) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/venues", get(venues))
        .route("/venues/search", post(search_venues))
        .route(
            "/venues/create",
            get(create_venue_form).post(create_venue_submission),
        )
        .route("/venues/:id", get(show_venue).delete(delete_venue))
        .route("/venues/:id/edit", get(edit_venue).post(edit_venue_submission))
        .route("/venues/:id/delete", post(delete_venue))
        .route("/artists", get(artists))
        .route("/artists/search", post(search_artists))
        .route(
            "/artists/create",
            get(create_artist_form).post(create_artist_submission),
        )
        .route("/artists/:id", get(show_artist).delete(delete_artist))
        .route(
            "/artists/:id/edit",
            get(edit_artist).post(edit_artist_submission),
        )
        .route("/artists/:id/delete", post(delete_artist))
        .route("/shows", get(shows))
        .route(
            "/shows/create",
            get(create_show_form).post(create_show_submission),
        )
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}
