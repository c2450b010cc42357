//! Typed async client for the Winlink CMS Web Services API.
//!
//! The CMS exposes callsign account management (creation, passwords,
//! recovery email, lockout status), sysop profile records, and catalog
//! inquiries over a query-parameter HTTP API. Every JSON response wraps its
//! payload in a `ResponseStatus` envelope carrying the service's own error
//! code and message; an empty error code means success.
//!
//! This crate splits the work into two layers:
//!
//! - [`http`] - the request executor and envelope decoder. It injects the
//!   access key and output format into the query string, performs the call,
//!   classifies the outcome, and unwraps the envelope into an
//!   [`http::ApiResult`].
//! - [`api`] - typed operations ([`Account`], [`Sysop`], [`Inquiries`]) that
//!   project a decoded result into per-operation response structs.
//!
//! Errors are never swallowed and nothing is retried; every call yields
//! exactly one typed response or one [`CmsApiError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use winlink_cms::Account;
//!
//! # async fn example() -> Result<(), winlink_cms::CmsApiError> {
//! let account = Account::new("my-access-key")?;
//! let response = account.exists("ZZ0TST").await?;
//! if response.exists {
//!     println!("account is registered");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The crate logs through the [`log`] facade: each request is logged at
//! debug level before it is sent, and non-success outcomes at error level.
//! Without a logger installed by the embedding application this is a no-op.

pub mod api;
pub mod http;

pub use api::{Account, Inquiries, Sysop};
pub use http::{ApiResult, CmsApiError, CmsHttpClient, DEFAULT_HOSTNAME};
