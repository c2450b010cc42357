//! Error types for CMS client operations.
//!
//! This module defines the [`CmsApiError`] enum which covers all failure
//! modes when talking to the Winlink CMS web service: transport failures,
//! malformed response bodies, unexpected HTTP statuses, and business-level
//! errors reported inside the service's own response envelope.

use thiserror::Error;

/// Errors that can occur during CMS client operations.
///
/// All variants implement [`std::error::Error`] and [`std::fmt::Display`]
/// through the `thiserror` derive macro. The [`Service`](CmsApiError::Service)
/// variant is the dominant, expected kind: it carries the error code and
/// message the CMS itself reports, and is the one callers branch on. The
/// remaining variants indicate infrastructure or contract problems.
///
/// Nothing is retried internally; every error propagates to the immediate
/// caller.
#[derive(Debug, Error)]
pub enum CmsApiError {
    /// The HTTP request failed due to a network or connection error.
    ///
    /// Connection refused, timeout, DNS resolution failure, TLS handshake
    /// errors and the like. The underlying cause is preserved.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body violated the service contract.
    ///
    /// Either the body was not valid JSON, or it lacked the mandatory
    /// `ResponseStatus` envelope, or a payload field the operation requires
    /// was missing or had the wrong type. The message names the offending
    /// field where applicable.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The server returned an HTTP status outside 200-299 that is not the
    /// 400 validation case.
    ///
    /// Carries the raw status code and its reason phrase (or a generic
    /// unknown-status phrase for codes without one).
    #[error("unexpected HTTP status {status}: {reason}")]
    UnexpectedStatus {
        /// The HTTP status code returned by the server.
        status: u16,
        /// The resolved reason phrase for the status code.
        reason: String,
    },

    /// The CMS reported a business-level error inside a well-formed envelope.
    ///
    /// Produced whenever a response envelope carries a non-empty `ErrorCode`,
    /// whether it arrived with an HTTP success status or with the service's
    /// 400 validation status. Callers cannot distinguish the two, by
    /// contract.
    #[error("{error_code}: {error_message}")]
    Service {
        /// The error code reported by the CMS.
        error_code: String,
        /// The descriptive message reported by the CMS.
        error_message: String,
    },

    /// Failed to parse or construct a URL.
    ///
    /// Occurs when the configured hostname is malformed or joining the base
    /// URL with an endpoint path produces an invalid URL.
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}
