//! Wire-level types shared by the request executor and the typed adapters.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::CmsApiError;

/// Top-level key under which the CMS reports its own request status.
pub(crate) const RESPONSE_STATUS_KEY: &str = "ResponseStatus";

/// The status object the CMS attaches to every response body.
///
/// An empty `ErrorCode` indicates success. Used internally by the envelope
/// decoder; callers see the fields through [`ApiResult`].
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseStatus {
    #[serde(rename = "ErrorCode")]
    pub error_code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

/// The normalized outcome of one CMS request, after envelope unwrapping.
///
/// `error_code` is empty on success. On error, `data` is empty and the
/// error fields carry the values from the response envelope verbatim,
/// regardless of whether the envelope arrived with an HTTP success status
/// or the service's 400 validation status.
#[derive(Debug, Clone, Default)]
pub struct ApiResult {
    /// Error code reported by the CMS, or empty on success.
    pub error_code: String,
    /// Descriptive error message, or whatever the envelope carried.
    pub error_message: String,
    /// Payload fields of the response body, minus the envelope.
    pub data: Map<String, Value>,
}

impl ApiResult {
    /// Whether the envelope reported a business-level error.
    pub fn is_error(&self) -> bool {
        !self.error_code.is_empty()
    }

    /// Consumes the result, yielding the payload map on success.
    ///
    /// Fails with [`CmsApiError::Service`] if the envelope reported an
    /// error. Adapters call this before touching any payload field.
    pub fn into_data(self) -> Result<Map<String, Value>, CmsApiError> {
        if self.is_error() {
            return Err(CmsApiError::Service {
                error_code: self.error_code,
                error_message: self.error_message,
            });
        }
        Ok(self.data)
    }
}

/// Extracts a named field from a response payload map.
///
/// A missing key, or a value that does not deserialize into `T`, is a
/// contract violation by the CMS and fails with
/// [`CmsApiError::MalformedResponse`] naming the field. Never defaults.
pub(crate) fn require_field<T: DeserializeOwned>(
    data: &Map<String, Value>,
    key: &str,
) -> Result<T, CmsApiError> {
    let value = data
        .get(key)
        .ok_or_else(|| CmsApiError::MalformedResponse(format!("missing expected field `{key}`")))?;
    serde_json::from_value(value.clone())
        .map_err(|e| CmsApiError::MalformedResponse(format!("field `{key}`: {e}")))
}
