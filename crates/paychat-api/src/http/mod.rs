//! HTTP/REST API layer for paychat.
//!
//! Axum-based REST API at `/api/v1/` with the envelope response format and
//! open CORS for a browser front end.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
