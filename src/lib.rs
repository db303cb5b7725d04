pub mod booking;
pub mod coffee;
pub mod config;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod observability;
pub mod seed;
pub mod server;
pub mod storage;
pub mod trivia;
