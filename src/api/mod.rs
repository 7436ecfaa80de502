//! API Module
//!
//! HTTP handlers and routing for the cache server.
//!
//! # Endpoints
//! - `PUT /objects/:key` - Store raw bytes under a key
//! - `GET /objects/:key` - Retrieve stored bytes
//! - `DELETE /objects/:key` - Delete a key
//! - `GET /stats` - Occupancy statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
