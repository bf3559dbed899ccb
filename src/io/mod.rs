//! File output (forecast CSV export).

pub mod export;
