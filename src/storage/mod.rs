pub mod codec;
pub mod database;
pub mod repository;

pub use database::Database;
pub use repository::{Record, Repository, SqliteRepository, Stored};
