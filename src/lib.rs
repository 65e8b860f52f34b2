//! `pushover`: a Rust client for the Pushover push-notification API.
//!
//! Builds a validated message from a title, a body and [`PushOptions`],
//! POSTs it form-encoded to the messages endpoint and returns a
//! [`PushResponse`] carrying the service status, request id, error list and
//! the rate-limit quota read from the response headers.
//!
//! Invalid input fails with [`PushError::InvalidArgument`] before any network
//! access. A message the service declines is *not* an error: it comes back
//! as a `PushResponse` whose [`is_accepted()`](PushResponse::is_accepted) is
//! false.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use pushover::{Priority, PushOptions, Pushover};
//!
//! # async fn example() -> Result<(), pushover::PushError> {
//! let client = Pushover::new("app-token")?;
//! let options = PushOptions::to("user-key").priority(Priority::High);
//!
//! let resp = client.push_with("Server Down", "Database unreachable", &options).await?;
//! if !resp.is_accepted() {
//!     eprintln!("rejected: {:?}", resp.errors);
//! }
//! println!("{} pushes left", resp.rate_limit.remaining);
//! # Ok(())
//! # }
//! ```
//!
//! Outside an async runtime use the `_blocking` variants:
//!
//! ```rust,no_run
//! # fn example() -> Result<(), pushover::PushError> {
//! let client = pushover::Pushover::new("app-token")?;
//! let resp = client.push_with_blocking("Backup", "done", &pushover::PushOptions::to("user-key"))?;
//! # Ok(())
//! # }
//! ```
//!
//! Validation can also be run on its own:
//!
//! ```rust
//! use pushover::{PushOptions, PushRequest};
//!
//! let err = PushRequest::build("app-token", "title", "", &PushOptions::to("user-key")).unwrap_err();
//! assert_eq!(err.field(), Some("message"));
//! ```

pub mod client;
pub mod transport;
pub mod types;
mod validate;

// Re-export the most commonly used items at the crate root.
pub use client::{rate_limit_from_headers, Pushover, PushoverBuilder, DEFAULT_USER_AGENT};
pub use transport::{HttpReply, HttpTransport, Transport};
pub use types::{
    Priority, PushError, PushOptions, PushRequest, PushResponse, PushResult, RateLimit, Sound,
    API_URL, MAX_MESSAGE_LEN, MAX_RECIPIENTS, MAX_TITLE_LEN, MAX_URL_LEN, MAX_URL_TITLE_LEN,
    STATUS_ACCEPTED,
};
