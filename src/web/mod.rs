//! HTTP surface of the file manager.
//!
//! Every error is answered as `{"error": "..."}` with status 400, 404 or 500.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
