//! Tollgate HTTP presentation layer
//!
//! Accepts location samples over HTTP and reports the transition outcome.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::{RequestId, RequestIdLayer};
pub use routes::create_router;
pub use state::AppState;
