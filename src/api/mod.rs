//! REST API client module for the warehouse backend.
//!
//! The API uses JWT bearer token authentication; token pairs are obtained
//! through `/api/token/` and rotated through `/api/token/refresh/`.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
