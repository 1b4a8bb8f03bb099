//! # Middleware
//!
//! Request tracing for the repository route.

pub mod tracing_layer;
