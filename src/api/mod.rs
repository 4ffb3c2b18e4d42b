//! # API Module
//!
//! HTTP endpoints served by the local callback server during `splister auth`.
//!
//! - [`callback`] - Receives the redirect from Spotify's authorization server,
//!   checks the `state` parameter and exchanges the authorization code for a
//!   token.
//!
//! The endpoint is built with [Axum](https://docs.rs/axum); the server itself
//! lives in [`crate::server`].

mod callback;

pub use callback::callback;
