//! HTTP layer for the Winlink CMS web service.
//!
//! This module owns the request lifecycle: [`CmsHttpClient`] attaches the
//! access key, performs the call, classifies the outcome, and unwraps the
//! `ResponseStatus` envelope every CMS response carries, producing an
//! [`ApiResult`] or a [`CmsApiError`]. The typed operation surface built on
//! top of it lives in [`crate::api`].

mod error;
mod http_client;
mod types;

pub use error::CmsApiError;
pub use http_client::{CmsHttpClient, DEFAULT_HOSTNAME};
pub use types::ApiResult;

pub(crate) use types::require_field;
