use log::{debug, error};
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};
use url::Url;

use super::error::CmsApiError;
use super::types::{ApiResult, RESPONSE_STATUS_KEY, ResponseStatus};

/// Hostname of the production CMS.
pub const DEFAULT_HOSTNAME: &str = "api.winlink.org";

/// Query parameter carrying the web service access key.
const KEY_PARAM: &str = "key";
/// Query parameter selecting the response serialization format.
const FORMAT_PARAM: &str = "format";

/// Low-level request executor and envelope decoder for the CMS API.
///
/// Every operation in the crate funnels through this client: it attaches the
/// access key and output format to the query string, performs the HTTP
/// round-trip, and decodes the `ResponseStatus` envelope the CMS wraps
/// around every JSON body. The outcome is an [`ApiResult`] that the typed
/// adapters in [`crate::api`] project into per-operation structs.
///
/// The client holds no mutable state; a fresh transport context is acquired
/// for each request and released when the call returns, on every exit path.
/// Nothing is retried and no timeout is imposed here.
#[derive(Debug, Clone)]
pub struct CmsHttpClient {
    api_key: String,
    base_url: Url,
    danger_accept_invalid_certs: bool,
}

impl CmsHttpClient {
    /// Creates a client for the production CMS at [`DEFAULT_HOSTNAME`].
    ///
    /// # Errors
    ///
    /// Returns [`CmsApiError::Url`] if the default base URL cannot be built,
    /// which only happens if the crate constant is broken.
    pub fn new(api_key: &str) -> Result<Self, CmsApiError> {
        Self::for_hostname(api_key, DEFAULT_HOSTNAME)
    }

    /// Creates a client for an alternate CMS deployment, e.g. the test
    /// instance at `cms-z.winlink.org`. The scheme is always HTTPS.
    ///
    /// # Errors
    ///
    /// Returns [`CmsApiError::Url`] if `hostname` does not form a valid URL.
    pub fn for_hostname(api_key: &str, hostname: &str) -> Result<Self, CmsApiError> {
        let base_url = Url::parse(&format!("https://{hostname}/"))?;
        Ok(Self::with_config(api_key, base_url, false))
    }

    /// Creates a client with full control over the base URL and TLS
    /// certificate verification.
    ///
    /// Setting `danger_accept_invalid_certs` disables certificate
    /// verification for every request made through this client. The only
    /// known legitimate use is a staging host with a self-signed
    /// certificate; verification stays on unless a caller opts out here.
    pub fn with_config(api_key: &str, base_url: Url, danger_accept_invalid_certs: bool) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url,
            danger_accept_invalid_certs,
        }
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Makes an HTTP GET request against `endpoint`.
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiResult, CmsApiError> {
        self.execute(Method::GET, endpoint, params, None).await
    }

    /// Makes an HTTP POST request against `endpoint`.
    ///
    /// `params` still travel in the query string; `body`, when present, is
    /// sent as a JSON body in addition to them.
    pub async fn post(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<ApiResult, CmsApiError> {
        self.execute(Method::POST, endpoint, params, body).await
    }

    /// Performs one request and decodes the response envelope.
    ///
    /// Classification of the raw outcome:
    ///
    /// - transport failure: [`CmsApiError::Transport`], never retried
    /// - status 200-299: body parsed as JSON, envelope unwrapped; the
    ///   envelope's own `ErrorCode` is authoritative even on HTTP success
    /// - status 400: the CMS reports validation failures this way while
    ///   still emitting a well-formed envelope, so the envelope error is
    ///   extracted and returned as a normal [`ApiResult`]
    /// - any other status: [`CmsApiError::UnexpectedStatus`]
    async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<ApiResult, CmsApiError> {
        let mut url = self.base_url.join(endpoint)?;
        {
            let mut pairs = url.query_pairs_mut();
            // The access key and output format are appended last and replace
            // any caller-supplied values of the same name.
            for (name, value) in params
                .iter()
                .filter(|(name, _)| *name != KEY_PARAM && *name != FORMAT_PARAM)
            {
                pairs.append_pair(name, value);
            }
            pairs.append_pair(KEY_PARAM, &self.api_key);
            pairs.append_pair(FORMAT_PARAM, "json");
        }

        debug!(method:% = method, url:% = url; "sending CMS API request");

        // Fresh transport context per request, dropped on every exit path.
        // Redirects are not followed: a 3xx status must reach outcome
        // classification with its original status code.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .build()?;

        let mut request = client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!(method:% = method, url:% = url; "CMS API request failed: {e}");
                return Err(CmsApiError::Transport(e));
            },
        };

        let status = response.status();
        let is_success = status.is_success();
        if !is_success {
            error!(
                method:% = method,
                url:% = url,
                success = is_success,
                status = status.as_u16();
                "CMS API request was not successful"
            );
        }
        let body_text = response.text().await?;

        if is_success {
            return decode_envelope(&body_text).inspect_err(|e| {
                error!(
                    method:% = method,
                    url:% = url,
                    status = status.as_u16();
                    "failed to decode CMS response: {e}"
                );
            });
        }

        if status == StatusCode::BAD_REQUEST {
            // Validation-error path: same envelope shape, payload discarded.
            let mut result = decode_envelope(&body_text)?;
            result.data = Map::new();
            return Ok(result);
        }

        let reason = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("unknown HTTP status code {}", status.as_u16()));
        Err(CmsApiError::UnexpectedStatus {
            status: status.as_u16(),
            reason,
        })
    }
}

/// Splits a response body into the service's status fields and the payload.
///
/// The body must be a JSON object carrying a `ResponseStatus` member with
/// `ErrorCode` and `Message`; anything else is a contract violation. When
/// the envelope reports an error the payload is dropped, so a result either
/// has data or error fields, never both.
fn decode_envelope(body: &str) -> Result<ApiResult, CmsApiError> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| CmsApiError::MalformedResponse(format!("bad JSON in response body: {e}")))?;
    let Value::Object(mut fields) = parsed else {
        return Err(CmsApiError::MalformedResponse(
            "response body is not a JSON object".to_string(),
        ));
    };
    let status = fields.remove(RESPONSE_STATUS_KEY).ok_or_else(|| {
        CmsApiError::MalformedResponse(format!("missing expected field `{RESPONSE_STATUS_KEY}`"))
    })?;
    let status: ResponseStatus = serde_json::from_value(status)
        .map_err(|e| CmsApiError::MalformedResponse(format!("field `{RESPONSE_STATUS_KEY}`: {e}")))?;

    if status.error_code.is_empty() {
        Ok(ApiResult {
            error_code: String::new(),
            error_message: status.message,
            data: fields,
        })
    } else {
        Ok(ApiResult {
            error_code: status.error_code,
            error_message: status.message,
            data: Map::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CmsHttpClient {
        let base_url = Url::parse(&server.uri()).unwrap();
        CmsHttpClient::with_config("TESTKEY", base_url, false)
    }

    fn envelope(error_code: &str, message: &str, payload: Value) -> String {
        let mut body = payload;
        body["ResponseStatus"] = json!({"ErrorCode": error_code, "Message": message});
        body.to_string()
    }

    #[test]
    fn decode_envelope_success_strips_status_from_payload() {
        let body = envelope("", "", json!({"CallsignExists": true}));
        let result = decode_envelope(&body).unwrap();
        assert!(!result.is_error());
        assert_eq!(result.data.get("CallsignExists"), Some(&json!(true)));
        assert!(!result.data.contains_key(RESPONSE_STATUS_KEY));
    }

    #[test]
    fn decode_envelope_error_code_wins_over_payload() {
        let body = envelope("2001", "No such account", json!({"CallsignExists": true}));
        let result = decode_envelope(&body).unwrap();
        assert_eq!(result.error_code, "2001");
        assert_eq!(result.error_message, "No such account");
        assert!(result.data.is_empty());
    }

    #[test]
    fn decode_envelope_rejects_bad_json() {
        let err = decode_envelope("{\"some bad json\": ").unwrap_err();
        assert!(matches!(err, CmsApiError::MalformedResponse(_)));
    }

    #[test]
    fn decode_envelope_rejects_non_object_body() {
        let err = decode_envelope("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, CmsApiError::MalformedResponse(_)));
    }

    #[test]
    fn decode_envelope_requires_response_status() {
        let err = decode_envelope("{\"CallsignExists\": true}").unwrap_err();
        match err {
            CmsApiError::MalformedResponse(msg) => assert!(msg.contains(RESPONSE_STATUS_KEY)),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn decode_envelope_requires_status_fields() {
        let err = decode_envelope("{\"ResponseStatus\": {\"ErrorCode\": \"\"}}").unwrap_err();
        assert!(matches!(err, CmsApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn key_and_format_params_are_not_caller_overridable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account/exists/"))
            .and(query_param("key", "TESTKEY"))
            .and(query_param("format", "json"))
            .and(query_param("Callsign", "ZZ0TST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(envelope("", "", json!({"CallsignExists": true}))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client
            .get(
                "account/exists/",
                &[
                    ("Callsign", "ZZ0TST"),
                    ("key", "SPOOFED"),
                    ("format", "xml"),
                ],
            )
            .await
            .unwrap();
        assert!(!result.is_error());

        // The spoofed values must not appear anywhere in the query string.
        let requests = server.received_requests().await.unwrap();
        let pairs: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(!pairs.contains(&("key".to_string(), "SPOOFED".to_string())));
        assert!(!pairs.contains(&("format".to_string(), "xml".to_string())));
    }

    #[tokio::test]
    async fn http_400_with_envelope_yields_validation_error_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/account/add/"))
            .respond_with(ResponseTemplate::new(400).set_body_string(envelope(
                "1002",
                "Password too short",
                json!({}),
            )))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.post("account/add/", &[], None).await.unwrap();
        assert_eq!(result.error_code, "1002");
        assert_eq!(result.error_message, "Password too short");
        assert!(result.data.is_empty());
    }

    #[tokio::test]
    async fn unexpected_status_is_surfaced_with_reason() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get("account/exists/", &[]).await.unwrap_err();
        match err {
            CmsApiError::UnexpectedStatus { status, reason } => {
                assert_eq!(status, 503);
                assert_eq!(reason, "Service Unavailable");
            },
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn redirect_status_is_not_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account/exists/"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("Location", "/elsewhere"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/elsewhere"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(envelope("", "", json!({"CallsignExists": true}))),
            )
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get("account/exists/", &[]).await.unwrap_err();
        match err {
            CmsApiError::UnexpectedStatus { status, reason } => {
                assert_eq!(status, 301);
                assert_eq!(reason, "Moved Permanently");
            },
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn status_without_reason_phrase_gets_generic_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(599))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get("x", &[]).await.unwrap_err();
        match err {
            CmsApiError::UnexpectedStatus { status, reason } => {
                assert_eq!(status, 599);
                assert!(reason.contains("599"));
            },
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_json_on_success_status_is_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get("account/exists/", &[]).await.unwrap_err();
        assert!(matches!(err, CmsApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn bad_json_on_validation_status_is_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("<html>Bad Request</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.post("account/add/", &[], None).await.unwrap_err();
        assert!(matches!(err, CmsApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn connection_failure_is_a_transport_error() {
        // Nothing listens on the server's port once it is dropped. A bare
        // (non-pooled) server is required: pooled servers from
        // `MockServer::start()` keep listening after drop.
        let server = MockServer::builder().start().await;
        let client = client_for(&server);
        drop(server);

        let err = client.get("account/exists/", &[]).await.unwrap_err();
        assert!(matches!(err, CmsApiError::Transport(_)));
    }
}
