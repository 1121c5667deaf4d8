//! crossplane-spy HTTP surface: configuration and the axum router.

#![forbid(unsafe_code)]

pub mod config;
pub mod routes;

pub use config::Config;
pub use routes::{router, SharedApi};
