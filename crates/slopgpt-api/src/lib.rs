//! SlopGPT HTTP API: the conversation and lead intake endpoints.
//!
//! Exposes `POST /api/chat` and `POST /api/lead` plus a health check, with
//! CORS, compression, a body limit, and a per-second rate limiter.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
