//! # API Module
//!
//! HTTP handlers for the local listener that receives Spotify's OAuth
//! redirect.
//!
//! ## Endpoints
//!
//! - [`auth_callback`] - Receives the authorization code (or the denial) and
//!   forwards it, once, to the waiting authorization flow.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use phraselist::api::{CallbackState, auth_callback};
//!
//! let app = Router::new()
//!     .route("/auth_callback", get(auth_callback))
//!     .layer(Extension(state));
//! ```

mod callback;

pub use callback::CallbackOutcome;
pub use callback::CallbackState;
pub use callback::auth_callback;
