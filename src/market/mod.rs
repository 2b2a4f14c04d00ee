//! Market-data fetchers for Alpha Vantage and Tiingo.
//!
//! Layout:
//! - `client.rs`: shared reqwest client construction and status handling
//! - `format.rs`: console tables and key/value rendering
//! - `alphavantage/`, `tiingo/`: request builders, clients and per-endpoint renderers

pub mod alphavantage;
pub mod client;
pub mod error;
pub mod format;
pub mod tiingo;

pub use alphavantage::AlphaVantageClient;
pub use error::MarketError;
pub use tiingo::TiingoClient;
