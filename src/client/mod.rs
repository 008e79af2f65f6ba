//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    Ad, ApiKey, AttributionDescriptor, BaseUrl, Campaign, Channel, CrmCustomField,
    CrmCustomFieldGroup, CrmToken, Grouping, Keyword, Metric, Payload, Placement, Project, Report,
    ValidationError,
};
use crate::transport::{EntityTransportError, ReportTransportError};

mod resolve;

#[cfg(test)]
mod fake;

const ENV_API_KEY: &str = "SMARTIS_API_KEY";
const ENV_CRM_TOKEN: &str = "SMARTIS_CRM_TOKEN";
const ENV_BASE_URL: &str = "SMARTIS_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "SMARTIS_TIMEOUT_SECS";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    /// POST `body` as JSON with `Authorization: Bearer <api_key>`.
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .bearer_auth(api_key)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

/// Smartis API operations, each a fixed path under the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Report,
    Projects,
    Metrics,
    Groupings,
    Attributions,
    Channels,
    Placements,
    Campaigns,
    Ads,
    Keywords,
    CrmCustomFields,
    CrmCustomFieldGroups,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Self::Report => "reports/getReport",
            Self::Projects => "projects/get",
            Self::Metrics => "metrics/get",
            Self::Groupings => "reports/getGroupings",
            Self::Attributions => "reports/getModelAttributions",
            Self::Channels => "reports/getChannels",
            Self::Placements => "reports/getPlacements",
            Self::Campaigns => "reports/getCampaigns",
            Self::Ads => "reports/getAds",
            Self::Keywords => "reports/getKeywords",
            Self::CrmCustomFields => "crm/crmCustomField/get",
            Self::CrmCustomFieldGroups => "crm/crmCustomFieldGroup/get",
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmartisClient`].
pub enum SmartisError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// HTTP 401; the API key was rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// HTTP 500.
    #[error("internal server error")]
    InternalServerError,

    /// Non-successful HTTP status with a `{"error": "..."}` body.
    #[error("API error: {message}")]
    Api { message: String },

    /// Non-successful HTTP status without a recognizable error body.
    #[error("unknown error: HTTP {status}")]
    UnknownStatus { status: u16 },

    /// Report payload did not have the expected structure, or a CRM column
    /// carried a non-numeric reference.
    #[error("malformed report: {0}")]
    MalformedReport(String),

    /// The `reports` object of a report response was empty.
    #[error("no reports data")]
    NoData,

    /// A CRM operation was requested but no CRM token is configured.
    #[error("CRM token is not configured")]
    MissingCredential,

    /// Response body of a listing endpoint could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// Request body could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<ReportTransportError> for SmartisError {
    fn from(value: ReportTransportError) -> Self {
        match value {
            ReportTransportError::NoData => Self::NoData,
            other => Self::MalformedReport(other.to_string()),
        }
    }
}

impl From<EntityTransportError> for SmartisError {
    fn from(value: EntityTransportError) -> Self {
        Self::Parse(Box::new(value))
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SmartisClient`].
///
/// Use this when you need a CRM token, a different API root, a timeout, or a
/// custom user-agent.
pub struct SmartisClientBuilder {
    api_key: ApiKey,
    crm_token: Option<CrmToken>,
    base_url: Option<BaseUrl>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SmartisClientBuilder {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            crm_token: None,
            base_url: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Configure from the environment.
    ///
    /// - `SMARTIS_API_KEY` (required)
    /// - `SMARTIS_CRM_TOKEN`
    /// - `SMARTIS_BASE_URL`
    /// - `SMARTIS_TIMEOUT_SECS`
    ///
    /// Empty values are treated as unset; a timeout that is not a whole number
    /// of seconds is rejected.
    pub fn from_env() -> Result<Self, SmartisError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SmartisError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = ApiKey::new(var(ENV_API_KEY).unwrap_or_default())?;
        let mut builder = Self::new(api_key);
        if let Some(token) = var(ENV_CRM_TOKEN) {
            builder = builder.crm_token(CrmToken::new(token)?);
        }
        if let Some(url) = var(ENV_BASE_URL) {
            builder = builder.base_url(BaseUrl::parse(url)?);
        }
        if let Some(secs) = var(ENV_TIMEOUT_SECS) {
            let secs = secs
                .trim()
                .parse::<u64>()
                .map_err(|_| ValidationError::InvalidTimeout { input: secs.clone() })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder)
    }

    /// Token for the CRM endpoints and for column name resolution.
    pub fn crm_token(mut self, token: CrmToken) -> Self {
        self.crm_token = Some(token);
        self
    }

    /// Override the API root (default `https://my.smartis.bi/api/`).
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`SmartisClient`].
    pub fn build(self) -> Result<SmartisClient, SmartisError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| SmartisError::Transport(Box::new(err)))?;

        Ok(SmartisClient {
            api_key: self.api_key,
            crm_token: self.crm_token,
            base_url: base_url_string(self.base_url.as_ref()),
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn base_url_string(base_url: Option<&BaseUrl>) -> String {
    base_url
        .map(BaseUrl::as_str)
        .unwrap_or(BaseUrl::DEFAULT)
        .to_owned()
}

#[derive(Clone)]
/// High-level Smartis client.
///
/// Every call is a single `POST` (name resolution issues up to two). Dropping
/// a returned future aborts the request in flight; responses are decoded only
/// once fully received.
pub struct SmartisClient {
    api_key: ApiKey,
    crm_token: Option<CrmToken>,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl SmartisClient {
    /// Create a client for the production API without a CRM token.
    ///
    /// For more customization, use [`SmartisClient::builder`].
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            crm_token: None,
            base_url: base_url_string(None),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(api_key: ApiKey) -> SmartisClientBuilder {
        SmartisClientBuilder::new(api_key)
    }

    /// Request a report and build one [`Report`] per returned metric.
    ///
    /// Reports come back in no particular order. Errors:
    /// - [`SmartisError::NoData`] when the response holds no reports at all,
    /// - [`SmartisError::MalformedReport`] when any row is not a flat object.
    pub async fn get_report(&self, payload: &Payload) -> Result<Vec<Report>, SmartisError> {
        let body =
            crate::transport::encode_report_request(payload).map_err(SmartisError::Encode)?;
        let response = self.send(Endpoint::Report, body).await?;
        Ok(crate::transport::decode_reports_json_response(&response)?)
    }

    pub async fn get_projects(&self) -> Result<Vec<Project>, SmartisError> {
        let response = self.send(Endpoint::Projects, Vec::new()).await?;
        Ok(crate::transport::decode_projects_json_response(&response)?)
    }

    pub async fn get_metrics(&self) -> Result<Vec<Metric>, SmartisError> {
        let response = self.send(Endpoint::Metrics, Vec::new()).await?;
        Ok(crate::transport::decode_metrics_json_response(&response)?)
    }

    pub async fn get_groupings(&self) -> Result<Vec<Grouping>, SmartisError> {
        let response = self.send(Endpoint::Groupings, Vec::new()).await?;
        Ok(crate::transport::decode_groupings_json_response(&response)?)
    }

    /// List attribution models available to the account.
    pub async fn get_attributions(&self) -> Result<Vec<AttributionDescriptor>, SmartisError> {
        let response = self.send(Endpoint::Attributions, Vec::new()).await?;
        Ok(crate::transport::decode_attributions_json_response(&response)?)
    }

    pub async fn get_channels(&self) -> Result<Vec<Channel>, SmartisError> {
        let response = self.send(Endpoint::Channels, Vec::new()).await?;
        Ok(crate::transport::decode_channels_json_response(&response)?)
    }

    pub async fn get_placements(&self) -> Result<Vec<Placement>, SmartisError> {
        let response = self.send(Endpoint::Placements, Vec::new()).await?;
        Ok(crate::transport::decode_placements_json_response(&response)?)
    }

    pub async fn get_campaigns(&self, ids: &[i64]) -> Result<Vec<Campaign>, SmartisError> {
        let body = crate::transport::encode_id_filter(ids).map_err(SmartisError::Encode)?;
        let response = self.send(Endpoint::Campaigns, body).await?;
        Ok(crate::transport::decode_campaigns_json_response(&response)?)
    }

    pub async fn get_ads(&self, ids: &[i64]) -> Result<Vec<Ad>, SmartisError> {
        let body = crate::transport::encode_id_filter(ids).map_err(SmartisError::Encode)?;
        let response = self.send(Endpoint::Ads, body).await?;
        Ok(crate::transport::decode_ads_json_response(&response)?)
    }

    pub async fn get_keywords(&self, ids: &[i64]) -> Result<Vec<Keyword>, SmartisError> {
        let body = crate::transport::encode_id_filter(ids).map_err(SmartisError::Encode)?;
        let response = self.send(Endpoint::Keywords, body).await?;
        Ok(crate::transport::decode_keywords_json_response(&response)?)
    }

    /// Look up CRM custom fields by id.
    ///
    /// Requires a CRM token; without one this fails with
    /// [`SmartisError::MissingCredential`] before any request is made.
    pub async fn get_crm_custom_fields(
        &self,
        ids: &[i64],
    ) -> Result<Vec<CrmCustomField>, SmartisError> {
        let token = self.require_crm_token()?;
        let body =
            crate::transport::encode_crm_id_filter(ids, token).map_err(SmartisError::Encode)?;
        let response = self.send(Endpoint::CrmCustomFields, body).await?;
        Ok(crate::transport::decode_crm_custom_fields_json_response(&response)?)
    }

    /// Look up CRM custom-field groups by id. Requires a CRM token.
    pub async fn get_crm_custom_field_groups(
        &self,
        ids: &[i64],
    ) -> Result<Vec<CrmCustomFieldGroup>, SmartisError> {
        let token = self.require_crm_token()?;
        let body =
            crate::transport::encode_crm_id_filter(ids, token).map_err(SmartisError::Encode)?;
        let response = self.send(Endpoint::CrmCustomFieldGroups, body).await?;
        Ok(crate::transport::decode_crm_custom_field_groups_json_response(&response)?)
    }

    fn require_crm_token(&self) -> Result<&CrmToken, SmartisError> {
        self.crm_token.as_ref().ok_or(SmartisError::MissingCredential)
    }

    async fn send(&self, endpoint: Endpoint, body: Vec<u8>) -> Result<String, SmartisError> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        tracing::debug!(endpoint = endpoint.path(), bytes = body.len(), "sending request");

        let response = self
            .http
            .post_json(&url, self.api_key.as_str(), body)
            .await
            .map_err(SmartisError::Transport)?;

        tracing::debug!(
            endpoint = endpoint.path(),
            status = response.status,
            "received response"
        );
        check_status(response)
    }
}

fn check_status(response: HttpResponse) -> Result<String, SmartisError> {
    match response.status {
        200..=299 => Ok(response.body),
        401 => Err(SmartisError::Unauthorized),
        500 => Err(SmartisError::InternalServerError),
        status => Err(match crate::transport::decode_api_error(&response.body) {
            Some(message) => SmartisError::Api { message },
            None => SmartisError::UnknownStatus { status },
        }),
    }
}
