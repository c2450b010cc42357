//! Typed operation surface of the CMS client.
//!
//! Each submodule wraps one area of the web service:
//!
//! - [`account`] - callsign account lifecycle, passwords, email addresses,
//!   lockout status
//! - [`sysop`] - station operator profile records
//! - [`inquiries`] - the catalog of retrievable inquiry items
//!
//! All operations follow the same shape: build query parameters, run the
//! request through [`crate::http::CmsHttpClient`], then project the decoded
//! [`crate::http::ApiResult`] into a typed response. A non-empty envelope
//! error code always surfaces as [`crate::http::CmsApiError::Service`]
//! before any payload field is touched.

pub mod account;
pub mod inquiries;
pub mod sysop;

pub use account::{
    Account, AccountExistsResponse, ForwardingAddressResponse, LockedOutResponse,
    MaxMessageSizeResponse, PasswordRecoveryResponse, PasswordValidationResponse,
};
pub use inquiries::{CatalogGetResponse, Inquiries, InquiryRecord};
pub use sysop::{Sysop, SysopDetails, SysopGetResponse, SysopRecord};
