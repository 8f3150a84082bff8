//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! trace correlation.

pub mod trace;

pub use trace::Trace;
