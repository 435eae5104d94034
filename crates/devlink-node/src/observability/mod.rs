//! # Observability Module
//!
//! - **Structured Logging**: pretty or JSON logs with an env-filter
//! - **Request Tracing**: a request ID on every span and response
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axum::Router;
//! use devlink_node::observability::{init_logging, request_id_layer, LogFormat};
//!
//! init_logging("info", LogFormat::Json).unwrap();
//!
//! let app: Router<()> = Router::new().layer(request_id_layer());
//! ```

mod logging;
pub mod middleware;

pub use logging::{init_logging, LogFormat};
pub use middleware::{request_id_layer, RequestId, REQUEST_ID_HEADER};
