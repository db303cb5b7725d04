//! Trivia question bank: paginated listing, search, per-category listing and
//! quiz draws over a JSON API.

pub mod handlers;
pub mod models;
pub mod pagination;
pub mod quiz;
pub mod requests;
pub mod router;
pub mod store;

pub use router::router;
pub use store::TriviaStore;
