//! External market data API clients

pub mod newsapi;
pub mod yahoo;

pub use newsapi::NewsApiProvider;
pub use yahoo::YahooFinanceClient;
