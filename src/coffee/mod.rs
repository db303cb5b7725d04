//! Coffee-shop drink catalog with permission-gated writes and staff role
//! management delegated to the identity provider.

pub mod auth;
pub mod directory;
pub mod handlers;
pub mod models;
pub mod recipe;
pub mod requests;
pub mod router;
pub mod state;
pub mod store;

pub use router::router;
pub use state::CoffeeApp;
pub use store::CoffeeStore;
