//! ARIMA model fitting and forward-date generation.

pub mod arima;
pub mod calendar;

pub use arima::fit_arima;
