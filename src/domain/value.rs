use url::Url;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Smartis API key, sent as `Authorization: Bearer <key>`.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// Name used in validation errors.
    pub const FIELD: &'static str = "api_key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Token granting access to the CRM endpoints (`smartis_crm_token`).
///
/// Invariant: non-empty after trimming.
pub struct CrmToken(String);

impl CrmToken {
    /// JSON field name used by Smartis (`smartis_crm_token`).
    pub const FIELD: &'static str = "smartis_crm_token";

    /// Create a validated [`CrmToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Project identifier a report is requested for (`project`), e.g. `object_1234`.
///
/// Invariant: non-empty after trimming.
pub struct ProjectCode(String);

impl ProjectCode {
    /// JSON field name used by Smartis (`project`).
    pub const FIELD: &'static str = "project";

    /// Create a validated [`ProjectCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Metric code as listed by `metrics/get` (e.g. `cost`, `visits`).
///
/// Invariant: non-empty after trimming and free of the `;` list separator.
pub struct MetricCode(String);

impl MetricCode {
    /// JSON field name used by Smartis (`metrics`).
    pub const FIELD: &'static str = "metrics";

    /// Create a validated [`MetricCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if trimmed.contains(';') {
            return Err(ValidationError::InvalidMetricCode {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Root URL every endpoint path is joined onto.
///
/// Invariant: absolute `http`/`https` URL whose path ends with `/`.
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Production API root.
    pub const DEFAULT: &'static str = "https://my.smartis.bi/api/";

    /// Parse and normalise a base URL.
    pub fn parse(input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        let trimmed = input.trim();
        let invalid = || ValidationError::InvalidBaseUrl {
            input: trimmed.to_owned(),
        };

        let mut url = Url::parse(trimmed).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
