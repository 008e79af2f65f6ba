//! Typed Rust client for the Smartis.bi reporting API.
//!
//! The crate has three layers: a domain layer of strong types, a transport
//! layer for wire-format quirks, and a small client layer orchestrating
//! requests.
//!
//! Report rows come back as schema-less maps. [`Report`] keeps them as rows of
//! classified [`Cell`]s; CRM columns can then be given human-readable names
//! with [`SmartisClient::resolve_column_names`] and looked up by column id
//! after [`Report::index_columns`].
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use smartis::{ApiKey, CrmToken, MetricCode, Payload, ProjectCode, SmartisClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smartis::SmartisError> {
//!     let client = SmartisClient::builder(ApiKey::new("...")?)
//!         .crm_token(CrmToken::new("...")?)
//!         .build()?;
//!
//!     let payload = Payload::new(
//!         ProjectCode::new("object_1234")?,
//!         vec![MetricCode::new("cost")?],
//!         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//!     )?;
//!
//!     for mut report in client.get_report(&payload).await? {
//!         client.resolve_column_names(&mut report).await?;
//!         report.index_columns();
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{SmartisClient, SmartisClientBuilder, SmartisError};
pub use domain::{
    Ad, ApiKey, Attribution, AttributionDescriptor, AttributionModel, BaseUrl, Campaign, Cell,
    CellKind, CellValue, Channel, CrmCustomField, CrmCustomFieldGroup, CrmToken, Filter,
    FilterCategory, GroupBy, Grouping, Keyword, Metric, MetricCode, Payload, Placement, Project,
    ProjectCode, Report, ReportType, Row, ValidationError,
};
