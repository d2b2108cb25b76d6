//! Middleware and request extractors.

pub mod auth;
pub mod session;

pub use auth::{RequireAdmin, RequireAuth};
pub use session::{create_session_layer, create_session_store};
