//! Zoom API provider.
//!
//! Server-to-server OAuth authentication, a token cache with optional
//! file-backed persistence, and a paginating client for the meetings and
//! participants endpoints.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod page;
pub mod tokens;

pub use auth::{Authenticator, TokenSource};
pub use client::{ZoomClient, ZoomUser};
pub use config::{ZoomConfig, ZoomCredentials};
pub use error::{ZoomError, ZoomErrorCode, ZoomResult};
pub use page::{Page, PageCursor};
pub use tokens::{AccessToken, TokenCache, TokenStore};
