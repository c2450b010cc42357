//! Callsign account operations.
//!
//! [`Account`] covers account lifecycle and credential management: existence
//! checks, account creation, password changes and validation, forwarding and
//! recovery email addresses, lockout status, and the account's message size
//! limit. Each operation returns a typed response projected out of the
//! decoded [`ApiResult`], or a [`CmsApiError`].

use serde_json::Value;

use crate::http::{ApiResult, CmsApiError, CmsHttpClient, require_field};

/// Outcome of an account existence check.
#[derive(Debug, Clone)]
pub struct AccountExistsResponse {
    /// True if the account exists and is not blocked.
    pub exists: bool,
}

impl AccountExistsResponse {
    fn from_result(result: ApiResult) -> Result<Self, CmsApiError> {
        let data = result.into_data()?;
        Ok(Self {
            exists: require_field(&data, "CallsignExists")?,
        })
    }
}

/// Outcome of a password validation check.
#[derive(Debug, Clone)]
pub struct PasswordValidationResponse {
    /// True if the supplied password matches the account password.
    pub is_valid: bool,
}

impl PasswordValidationResponse {
    fn from_result(result: ApiResult) -> Result<Self, CmsApiError> {
        let data = result.into_data()?;
        Ok(Self {
            is_valid: require_field(&data, "IsValid")?,
        })
    }
}

/// The alternate (forwarding) email address configured for an account.
#[derive(Debug, Clone)]
pub struct ForwardingAddressResponse {
    /// The forwarding address, with any `SMTP:` transport prefix removed.
    pub forwarding_address: String,
}

impl ForwardingAddressResponse {
    fn from_result(result: ApiResult) -> Result<Self, CmsApiError> {
        let data = result.into_data()?;
        let raw: String = require_field(&data, "AlternateEmail")?;
        // The CMS stores addresses with a transport marker, e.g.
        // "SMTP:user@example.com".
        let forwarding_address = raw.strip_prefix("SMTP:").map(str::to_string).unwrap_or(raw);
        Ok(Self { forwarding_address })
    }
}

/// The password recovery email address configured for an account.
#[derive(Debug, Clone)]
pub struct PasswordRecoveryResponse {
    /// Address the CMS sends password reminders to.
    pub recovery_address: String,
}

impl PasswordRecoveryResponse {
    fn from_result(result: ApiResult) -> Result<Self, CmsApiError> {
        let data = result.into_data()?;
        Ok(Self {
            recovery_address: require_field(&data, "RecoveryEmail")?,
        })
    }
}

/// Lockout state of an account, with the recorded reason when one exists.
#[derive(Debug, Clone)]
pub struct LockedOutResponse {
    /// True if the account is currently locked out.
    pub is_locked_out: bool,
    /// Human-readable lockout reason; empty when none was recorded.
    pub reason: String,
}

impl LockedOutResponse {
    fn from_result(result: ApiResult) -> Result<Self, CmsApiError> {
        let data = result.into_data()?;
        Ok(Self {
            is_locked_out: require_field(&data, "LockedOut")?,
            reason: String::new(),
        })
    }
}

/// The maximum message size the CMS accepts for an account.
#[derive(Debug, Clone)]
pub struct MaxMessageSizeResponse {
    /// Size limit in bytes.
    pub max_message_size: u64,
}

impl MaxMessageSizeResponse {
    fn from_result(result: ApiResult) -> Result<Self, CmsApiError> {
        let data = result.into_data()?;
        Ok(Self {
            max_message_size: require_field(&data, "MaxMessageSize")?,
        })
    }
}

/// Operations on a callsign (or tactical) account.
#[derive(Debug, Clone)]
pub struct Account {
    client: CmsHttpClient,
}

impl Account {
    /// Creates an account API bound to the production CMS.
    ///
    /// # Errors
    ///
    /// Returns [`CmsApiError::Url`] if the base URL cannot be built.
    pub fn new(api_key: &str) -> Result<Self, CmsApiError> {
        Ok(Self::from_client(CmsHttpClient::new(api_key)?))
    }

    /// Creates an account API bound to an alternate CMS deployment.
    ///
    /// # Errors
    ///
    /// Returns [`CmsApiError::Url`] if `hostname` does not form a valid URL.
    pub fn for_hostname(api_key: &str, hostname: &str) -> Result<Self, CmsApiError> {
        Ok(Self::from_client(CmsHttpClient::for_hostname(
            api_key, hostname,
        )?))
    }

    /// Creates an account API over an already-configured client.
    pub fn from_client(client: CmsHttpClient) -> Self {
        Self { client }
    }

    /// Checks whether an account exists for `callsign`.
    pub async fn exists(&self, callsign: &str) -> Result<AccountExistsResponse, CmsApiError> {
        let result = self
            .client
            .get("account/exists/", &[("Callsign", callsign)])
            .await?;
        AccountExistsResponse::from_result(result)
    }

    /// Adds a new account for `callsign`.
    ///
    /// `recovery_email` may be empty; when set it becomes the address used
    /// for password recovery.
    pub async fn add(
        &self,
        callsign: &str,
        password: &str,
        recovery_email: &str,
    ) -> Result<(), CmsApiError> {
        let params = [
            ("Callsign", callsign),
            ("Password", password),
            ("RecoveryEmail", recovery_email),
        ];
        let result = self.client.post("account/add/", &params, None).await?;
        result.into_data().map(|_| ())
    }

    /// Changes the account password if the old password is verified.
    pub async fn change_password(
        &self,
        callsign: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), CmsApiError> {
        let params = [
            ("Callsign", callsign),
            ("OldPassword", old_password),
            ("NewPassword", new_password),
        ];
        let result = self
            .client
            .post("account/password/change/", &params, None)
            .await?;
        result.into_data().map(|_| ())
    }

    /// Checks a password against the account without changing anything.
    pub async fn validate_password(
        &self,
        callsign: &str,
        password: &str,
    ) -> Result<PasswordValidationResponse, CmsApiError> {
        let params = [("Callsign", callsign), ("Password", password)];
        let result = self
            .client
            .get("account/password/validate", &params)
            .await?;
        PasswordValidationResponse::from_result(result)
    }

    /// Asks the CMS to send the account password to its recovery address.
    pub async fn send_password(&self, callsign: &str) -> Result<(), CmsApiError> {
        let result = self
            .client
            .post("account/password/send", &[("Callsign", callsign)], None)
            .await?;
        result.into_data().map(|_| ())
    }

    /// Gets the alternate (forwarding) address for the account.
    pub async fn forwarding_address(
        &self,
        callsign: &str,
        password: &str,
    ) -> Result<ForwardingAddressResponse, CmsApiError> {
        let params = [("Callsign", callsign), ("Password", password)];
        let result = self.client.get("account/alternateEmail/get", &params).await?;
        ForwardingAddressResponse::from_result(result)
    }

    /// Sets the alternate (forwarding) address for the account.
    pub async fn set_forwarding_address(
        &self,
        callsign: &str,
        password: &str,
        email_address: &str,
    ) -> Result<(), CmsApiError> {
        let params = [
            ("Callsign", callsign),
            ("Password", password),
            ("AlternateEmail", email_address),
        ];
        let result = self
            .client
            .post("account/alternateEmail/set", &params, None)
            .await?;
        result.into_data().map(|_| ())
    }

    /// Gets the password recovery address for the account.
    pub async fn recovery_address(
        &self,
        callsign: &str,
        password: &str,
    ) -> Result<PasswordRecoveryResponse, CmsApiError> {
        let params = [("Callsign", callsign), ("Password", password)];
        let result = self
            .client
            .get("account/password/recovery/email/get", &params)
            .await?;
        PasswordRecoveryResponse::from_result(result)
    }

    /// Sets the password recovery address for the account.
    pub async fn set_recovery_address(
        &self,
        callsign: &str,
        password: &str,
        email_address: &str,
    ) -> Result<(), CmsApiError> {
        let params = [
            ("Callsign", callsign),
            ("Password", password),
            ("RecoveryEmail", email_address),
        ];
        let result = self
            .client
            .post("account/password/recovery/email/set", &params, None)
            .await?;
        result.into_data().map(|_| ())
    }

    /// Gets the lockout status for the account, with the recorded reason.
    ///
    /// Two strictly sequential calls: the reason endpoint is only queried
    /// when the account is flagged locked out. The CMS legitimately omits
    /// `Reason` when none was recorded, so an absent reason is still a
    /// successful response with an empty string.
    pub async fn locked_out(&self, callsign: &str) -> Result<LockedOutResponse, CmsApiError> {
        let params = [("Callsign", callsign)];
        let result = self.client.get("account/lockedOut/get", &params).await?;
        let mut response = LockedOutResponse::from_result(result)?;
        if response.is_locked_out {
            let result = self
                .client
                .get("account/lockedOutReason/get", &params)
                .await?;
            if let Some(reason) = result.data.get("Reason").and_then(Value::as_str) {
                response.reason = reason.to_string();
            }
        }
        Ok(response)
    }

    /// Gets the maximum message size accepted for the account.
    pub async fn max_message_size(
        &self,
        callsign: &str,
        password: &str,
    ) -> Result<MaxMessageSizeResponse, CmsApiError> {
        let params = [("Callsign", callsign), ("Password", password)];
        let result = self
            .client
            .get("account/maxMessageSize/get", &params)
            .await?;
        MaxMessageSizeResponse::from_result(result)
    }
}
