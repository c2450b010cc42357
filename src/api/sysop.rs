//! Sysop profile operations.
//!
//! A sysop record holds the station operator's contact details for a
//! callsign account. [`Sysop::get`] returns the full record; [`Sysop::add`]
//! registers or replaces one.

use serde::Deserialize;

use crate::http::{ApiResult, CmsApiError, CmsHttpClient, require_field};

/// A sysop profile as stored by the CMS.
///
/// All fields are present on the wire; optional details the operator never
/// filled in come back as empty strings.
#[derive(Debug, Clone, Deserialize)]
pub struct SysopRecord {
    #[serde(rename = "Callsign")]
    pub callsign: String,
    #[serde(rename = "GridSquare")]
    pub grid_square: String,
    #[serde(rename = "SysopName")]
    pub sysop_name: String,
    #[serde(rename = "StreetAddress1")]
    pub street_address_1: String,
    #[serde(rename = "StreetAddress2")]
    pub street_address_2: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "PostalCode")]
    pub postal_code: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phones")]
    pub phones: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Comments")]
    pub comments: String,
}

/// Outcome of a sysop record fetch.
#[derive(Debug, Clone)]
pub struct SysopGetResponse {
    /// The sysop profile attached to the account.
    pub sysop: SysopRecord,
}

impl SysopGetResponse {
    fn from_result(result: ApiResult) -> Result<Self, CmsApiError> {
        let data = result.into_data()?;
        Ok(Self {
            sysop: require_field(&data, "Sysop")?,
        })
    }
}

/// Details submitted when registering a sysop record.
///
/// Callsign, password, sysop name, grid square, and email are required by
/// the CMS; the remaining fields may be left empty.
#[derive(Debug, Clone, Default)]
pub struct SysopDetails {
    pub callsign: String,
    pub password: String,
    pub sysop_name: String,
    pub grid_square: String,
    pub email: String,
    pub street_address_1: String,
    pub street_address_2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub phones: String,
    pub website: String,
    pub comments: String,
}

/// Operations on the sysop profile of a callsign account.
#[derive(Debug, Clone)]
pub struct Sysop {
    client: CmsHttpClient,
}

impl Sysop {
    /// Creates a sysop API bound to the production CMS.
    ///
    /// # Errors
    ///
    /// Returns [`CmsApiError::Url`] if the base URL cannot be built.
    pub fn new(api_key: &str) -> Result<Self, CmsApiError> {
        Ok(Self::from_client(CmsHttpClient::new(api_key)?))
    }

    /// Creates a sysop API bound to an alternate CMS deployment.
    ///
    /// # Errors
    ///
    /// Returns [`CmsApiError::Url`] if `hostname` does not form a valid URL.
    pub fn for_hostname(api_key: &str, hostname: &str) -> Result<Self, CmsApiError> {
        Ok(Self::from_client(CmsHttpClient::for_hostname(
            api_key, hostname,
        )?))
    }

    /// Creates a sysop API over an already-configured client.
    pub fn from_client(client: CmsHttpClient) -> Self {
        Self { client }
    }

    /// Adds sysop information to the callsign account.
    ///
    /// The service registers sysop records over GET.
    pub async fn add(&self, details: &SysopDetails) -> Result<(), CmsApiError> {
        let params = [
            ("Callsign", details.callsign.as_str()),
            ("Password", details.password.as_str()),
            ("SysopName", details.sysop_name.as_str()),
            ("GridSquare", details.grid_square.as_str()),
            ("Email", details.email.as_str()),
            ("StreetAddress1", details.street_address_1.as_str()),
            ("StreetAddress2", details.street_address_2.as_str()),
            ("City", details.city.as_str()),
            ("State", details.state.as_str()),
            ("Country", details.country.as_str()),
            ("PostalCode", details.postal_code.as_str()),
            ("Phones", details.phones.as_str()),
            ("Website", details.website.as_str()),
            ("Comments", details.comments.as_str()),
        ];
        let result = self.client.get("sysop/add/", &params).await?;
        result.into_data().map(|_| ())
    }

    /// Gets the sysop record for the account.
    pub async fn get(
        &self,
        callsign: &str,
        password: &str,
    ) -> Result<SysopGetResponse, CmsApiError> {
        let params = [("Callsign", callsign), ("Password", password)];
        let result = self.client.get("sysop2/get", &params).await?;
        SysopGetResponse::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn sysop_payload() -> serde_json::Value {
        json!({
            "Sysop": {
                "Callsign": "ZZ0TST",
                "GridSquare": "FN31pr",
                "SysopName": "Test Op",
                "StreetAddress1": "1 Main St",
                "StreetAddress2": "",
                "City": "Springfield",
                "State": "VT",
                "Country": "USA",
                "PostalCode": "05156",
                "Email": "op@example.com",
                "Phones": "",
                "Website": "",
                "Comments": ""
            }
        })
    }

    #[test]
    fn get_response_extracts_full_record() {
        let serde_json::Value::Object(data) = sysop_payload() else {
            unreachable!();
        };
        let result = ApiResult {
            error_code: String::new(),
            error_message: String::new(),
            data,
        };
        let response = SysopGetResponse::from_result(result).unwrap();
        assert_eq!(response.sysop.callsign, "ZZ0TST");
        assert_eq!(response.sysop.grid_square, "FN31pr");
        assert_eq!(response.sysop.email, "op@example.com");
        assert_eq!(response.sysop.street_address_2, "");
    }

    #[test]
    fn get_response_rejects_incomplete_record() {
        let mut data = Map::new();
        data.insert("Sysop".to_string(), json!({"Callsign": "ZZ0TST"}));
        let result = ApiResult {
            error_code: String::new(),
            error_message: String::new(),
            data,
        };
        let err = SysopGetResponse::from_result(result).unwrap_err();
        assert!(matches!(err, CmsApiError::MalformedResponse(_)));
    }

    #[test]
    fn envelope_error_takes_precedence() {
        let result = ApiResult {
            error_code: "4004".to_string(),
            error_message: "No sysop record".to_string(),
            data: Map::new(),
        };
        let err = SysopGetResponse::from_result(result).unwrap_err();
        assert!(matches!(err, CmsApiError::Service { .. }));
    }
}
