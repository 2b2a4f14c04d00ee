pub mod config;
pub mod error;
pub mod service;
pub mod router;
pub mod middleware;
pub mod handlers;
pub mod db;
pub mod market;
pub mod types;

pub use error::DeskError;
pub use market::MarketError;
pub use service::{AccountService, SecretHasher};
