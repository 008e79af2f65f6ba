//! Reference entities returned by the listing endpoints.
//!
//! Unknown response fields are ignored. Integer `0/1` flags are exposed as `bool`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    /// Project code used in report requests (e.g. `object_1234`).
    pub project: String,
    pub title: String,
    /// Unix timestamp.
    pub created_at: i64,
    pub is_active: bool,
    pub is_super_object: bool,
    pub can_grouping_by_objects: bool,
    pub project_fields: Vec<ProjectField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectField {
    pub value: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub id: i64,
    /// Code to request in [`Payload`](crate::domain::Payload).
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub category_title: String,
    pub category_sort: i64,
    pub is_system: bool,
    pub parent_id: i64,
    pub service_id: i64,
    pub is_group: Option<bool>,
    pub formula: Option<String>,
    pub calculate: String,
    pub date_create: i64,
    pub enable_original_data: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    pub id: i64,
    pub title: String,
    pub code: String,
    pub is_system: bool,
    pub sort: i64,
    pub client_id: i64,
}

/// Attribution model as described by `reports/getModelAttributions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributionDescriptor {
    pub id: i64,
    pub title: String,
    pub about: String,
    pub is_system: bool,
}

impl AttributionDescriptor {
    /// Matching [`AttributionModel`](crate::domain::AttributionModel), if known.
    pub fn model(&self) -> Option<crate::domain::AttributionModel> {
        u32::try_from(self.id)
            .ok()
            .and_then(crate::domain::AttributionModel::from_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: i64,
    pub title: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub is_visible: bool,
    pub is_default_for_channel: bool,
    pub parent_channel_id: i64,
    pub num_level: i64,
    pub category_id: Option<String>,
    pub client_id: i64,
    pub grouping_id: i64,
    pub sort: i64,
    pub date_create: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub category_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub id: i64,
    pub title: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub is_visible: bool,
    pub is_default_for_channel: bool,
    pub parent_channel_id: i64,
    pub num_level: i64,
    pub category_id: Option<String>,
    pub service_id: Option<i64>,
    pub client_id: i64,
    pub grouping_id: i64,
    pub sort: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub channel_id: i64,
    pub channel: Option<PlacementChannel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementChannel {
    pub id: i64,
    pub title: String,
    pub channel_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub id: i64,
    pub placement_id: i64,
    pub title: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ad {
    pub id: i64,
    pub external_id: String,
    pub placement_id: i64,
    pub campaign_id: i64,
    pub external_campaign_id: String,
    pub kind: String,
    pub title: String,
    pub text: String,
    pub text1: String,
    pub text2: Option<String>,
    pub preview_url: Option<String>,
    pub href: Option<String>,
    pub device: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub id: i64,
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrmCustomField {
    pub id: i64,
    pub crm_account_id: i64,
    pub element_type_id: i64,
    /// Display title written onto report cells by name resolution.
    pub title: String,
    pub field_type_id: i64,
    pub is_multiple: bool,
    pub group_id: i64,
    pub description: String,
    pub status: i64,
    pub is_filter: bool,
    pub filter_param_id: i64,
    pub default_visibility: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrmCustomFieldGroup {
    pub id: i64,
    /// Display title written onto report cells by name resolution.
    pub title: String,
    pub crm_account_id: i64,
    pub default_visibility: bool,
    pub sort: i64,
}
