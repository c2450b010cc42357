//! Catalog inquiry operations.

use serde::Deserialize;

use crate::http::{ApiResult, CmsApiError, CmsHttpClient, require_field};

/// One entry in the CMS inquiry catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct InquiryRecord {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "InquiryId")]
    pub inquiry_id: String,
    #[serde(rename = "Subject")]
    pub subject: String,
    /// Approximate size of the catalog item in bytes.
    #[serde(rename = "SizeEstimate")]
    pub size_estimate: i64,
}

/// Outcome of a catalog fetch.
#[derive(Debug, Clone)]
pub struct CatalogGetResponse {
    /// The catalog entries, in service order.
    pub inquiries: Vec<InquiryRecord>,
}

impl CatalogGetResponse {
    fn from_result(result: ApiResult) -> Result<Self, CmsApiError> {
        let data = result.into_data()?;
        Ok(Self {
            inquiries: require_field(&data, "Inquiries")?,
        })
    }
}

/// Operations on the CMS inquiry catalog.
#[derive(Debug, Clone)]
pub struct Inquiries {
    client: CmsHttpClient,
}

impl Inquiries {
    /// Creates an inquiries API bound to the production CMS.
    ///
    /// # Errors
    ///
    /// Returns [`CmsApiError::Url`] if the base URL cannot be built.
    pub fn new(api_key: &str) -> Result<Self, CmsApiError> {
        Ok(Self::from_client(CmsHttpClient::new(api_key)?))
    }

    /// Creates an inquiries API bound to an alternate CMS deployment.
    ///
    /// # Errors
    ///
    /// Returns [`CmsApiError::Url`] if `hostname` does not form a valid URL.
    pub fn for_hostname(api_key: &str, hostname: &str) -> Result<Self, CmsApiError> {
        Ok(Self::from_client(CmsHttpClient::for_hostname(
            api_key, hostname,
        )?))
    }

    /// Creates an inquiries API over an already-configured client.
    pub fn from_client(client: CmsHttpClient) -> Self {
        Self { client }
    }

    /// Returns the list of catalog items.
    pub async fn catalog(&self) -> Result<CatalogGetResponse, CmsApiError> {
        let result = self.client.get("inquiries/catalog/", &[]).await?;
        CatalogGetResponse::from_result(result)
    }
}
