//! Response models for the cache server API
//!
//! Request bodies are raw bytes, so only responses need DTOs.

pub mod responses;

pub use responses::{DeleteResponse, HealthResponse, SetResponse, StatsResponse};
