//! HTTP transport for the matcher and the coordinator
//!
//! A thin axum layer: it parses request parameters, calls the two core
//! operations and maps their errors to status codes.
//!
//! ```text
//! GET  /health                                   - liveness
//! GET  /classes?subject=&week_day=&time=         - availability search
//! POST /classes                                  - tutor registration
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use proffy::api::ApiServer;
//!
//! let server = ApiServer::new(repo, config.server.clone());
//! server.start().await?;
//! ```

pub mod routes;
pub mod server;

pub use routes::{create_router, AppState, CreateClassRequest, ErrorResponse};
pub use server::{ApiServer, ServerError};
