//! Fyyur: venue and artist directory with show booking, served as HTML pages.

pub mod forms;
pub mod handlers;
pub mod models;
pub mod router;
pub mod schedule;
pub mod search;
pub mod store;
pub mod templates;

pub use router::router;
pub use store::BookingStore;
