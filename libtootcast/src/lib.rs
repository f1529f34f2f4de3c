//! tootcast - post toots and threads to Mastodon-compatible instances
//!
//! The library behind the `toot-post` CLI: a pure content threading core,
//! a local multi-account store, and an explicitly typed client for the few
//! API endpoints posting involves.

pub mod accounts;
pub mod api;
pub mod content;
pub mod error;
pub mod logging;
pub mod media;
pub mod poster;
pub mod threader;

// Re-export commonly used types
pub use accounts::{Account, AccountStore};
pub use error::{Result, TootcastError};
pub use media::MediaFile;
pub use poster::ThreadPoster;
pub use threader::{thread_content, threadify, DEFAULT_MAX_CHARS};
