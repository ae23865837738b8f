//! Async ANBIMA API client—cached OAuth 2.0 client-credentials authentication wrapped around a
//! generic authenticated GET passthrough.
//!
//! The crate exposes one component, [`client::AnbimaClient`], which keeps a session token in
//! process memory and re-authenticates lazily whenever the cached token cannot be reused. All
//! failures are logged with their operation context and then propagated unchanged; there is no
//! retry, rate limiting, or token persistence.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod config;
pub mod error;
pub mod token;

mod _prelude {
	pub use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

	pub use async_lock::Mutex as AsyncMutex;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::Result;
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
