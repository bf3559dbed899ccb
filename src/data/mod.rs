//! Market-data acquisition: the Yahoo chart client and the fixed universe.

pub mod universe;
pub mod yahoo;

pub use universe::{fetch_dataset, STOCKS};
pub use yahoo::YahooClient;
