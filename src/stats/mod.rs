//! Statistical tests interpreted by the pipeline.

pub mod adf;

pub use adf::adf_test;
