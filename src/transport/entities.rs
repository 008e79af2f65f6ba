use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::flag::TransportFlag;
use crate::domain::{
    Ad, AttributionDescriptor, Campaign, Channel, CrmCustomField, CrmCustomFieldGroup, CrmToken,
    Grouping, Keyword, Metric, Placement, PlacementChannel, Project, ProjectField,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loose text field: the API sends strings, numbers or `null` interchangeably.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TransportText {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl TransportText {
    fn into_string(self) -> String {
        match self {
            Self::String(value) => value,
            Self::Number(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
        }
    }
}

fn text(value: Option<TransportText>) -> Option<String> {
    value.map(TransportText::into_string)
}

fn flag(value: Option<TransportFlag>) -> bool {
    value.is_some_and(TransportFlag::into_bool)
}

#[derive(Debug, Serialize)]
struct IdFilterJson<'a> {
    ids: &'a [i64],
    #[serde(skip_serializing_if = "Option::is_none")]
    smartis_crm_token: Option<&'a str>,
}

/// Request body of the id-filtered listing endpoints (`{"ids": [...]}`).
pub fn encode_id_filter(ids: &[i64]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&IdFilterJson {
        ids,
        smartis_crm_token: None,
    })
}

/// Request body of the CRM listing endpoints (ids plus `smartis_crm_token`).
pub fn encode_crm_id_filter(ids: &[i64], token: &CrmToken) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&IdFilterJson {
        ids,
        smartis_crm_token: Some(token.as_str()),
    })
}

#[derive(Debug, Deserialize)]
struct ProjectsJsonResponse {
    #[serde(default)]
    projects: Vec<ProjectJson>,
}

#[derive(Debug, Deserialize)]
struct ProjectJson {
    id: i64,
    #[serde(default)]
    project: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    is_active: Option<TransportFlag>,
    #[serde(default)]
    is_super_object: Option<TransportFlag>,
    #[serde(default)]
    can_grouping_by_objects: Option<TransportFlag>,
    #[serde(default)]
    project_fields: Vec<ProjectFieldJson>,
}

#[derive(Debug, Deserialize)]
struct ProjectFieldJson {
    #[serde(default)]
    value: String,
    #[serde(default)]
    title: String,
}

pub fn decode_projects_json_response(json: &str) -> Result<Vec<Project>, TransportError> {
    let parsed: ProjectsJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .projects
        .into_iter()
        .map(|p| Project {
            id: p.id,
            project: p.project,
            title: p.title,
            created_at: p.created_at,
            is_active: flag(p.is_active),
            is_super_object: flag(p.is_super_object),
            can_grouping_by_objects: flag(p.can_grouping_by_objects),
            project_fields: p
                .project_fields
                .into_iter()
                .map(|f| ProjectField {
                    value: f.value,
                    title: f.title,
                })
                .collect(),
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct MetricsJsonResponse {
    #[serde(default)]
    metrics: Vec<MetricJson>,
}

#[derive(Debug, Deserialize)]
struct MetricJson {
    id: i64,
    #[serde(default)]
    code: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category_id: i64,
    #[serde(default)]
    category_title: String,
    #[serde(default)]
    category_sort: i64,
    #[serde(default)]
    is_system: Option<TransportFlag>,
    #[serde(default)]
    m_parent: i64,
    #[serde(default)]
    service_id: i64,
    #[serde(default)]
    is_group: Option<TransportFlag>,
    #[serde(default)]
    formule: Option<String>,
    #[serde(default)]
    calculate: String,
    #[serde(default)]
    date_create: i64,
    #[serde(default)]
    enable_original_data: Option<TransportFlag>,
}

pub fn decode_metrics_json_response(json: &str) -> Result<Vec<Metric>, TransportError> {
    let parsed: MetricsJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .metrics
        .into_iter()
        .map(|m| Metric {
            id: m.id,
            code: m.code,
            title: m.title,
            description: m.description,
            category_id: m.category_id,
            category_title: m.category_title,
            category_sort: m.category_sort,
            is_system: flag(m.is_system),
            parent_id: m.m_parent,
            service_id: m.service_id,
            is_group: m.is_group.map(TransportFlag::into_bool),
            formula: m.formule,
            calculate: m.calculate,
            date_create: m.date_create,
            enable_original_data: flag(m.enable_original_data),
        })
        .collect())
}

// `groupings` and `modelAttributions` are objects keyed by id, not lists.

#[derive(Debug, Deserialize)]
struct GroupingsJsonResponse {
    #[serde(default)]
    groupings: BTreeMap<String, GroupingJson>,
}

#[derive(Debug, Deserialize)]
struct GroupingJson {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    is_system: Option<TransportFlag>,
    #[serde(default)]
    sort: i64,
    #[serde(default)]
    client_id: i64,
}

pub fn decode_groupings_json_response(json: &str) -> Result<Vec<Grouping>, TransportError> {
    let parsed: GroupingsJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .groupings
        .into_values()
        .map(|g| Grouping {
            id: g.id,
            title: g.title,
            code: g.code,
            is_system: flag(g.is_system),
            sort: g.sort,
            client_id: g.client_id,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct AttributionsJsonResponse {
    #[serde(default, rename = "modelAttributions")]
    model_attributions: BTreeMap<String, AttributionJson>,
}

#[derive(Debug, Deserialize)]
struct AttributionJson {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    about: String,
    #[serde(default)]
    is_system: Option<TransportFlag>,
}

pub fn decode_attributions_json_response(
    json: &str,
) -> Result<Vec<AttributionDescriptor>, TransportError> {
    let parsed: AttributionsJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .model_attributions
        .into_values()
        .map(|a| AttributionDescriptor {
            id: a.id,
            title: a.title,
            about: a.about,
            is_system: flag(a.is_system),
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct ChannelsJsonResponse {
    #[serde(default)]
    channels: Vec<ChannelJson>,
}

#[derive(Debug, Deserialize)]
struct ChannelJson {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "isActive")]
    is_active: Option<TransportFlag>,
    #[serde(default, rename = "isVisible")]
    is_visible: Option<TransportFlag>,
    #[serde(default)]
    is_default_for_channel: Option<TransportFlag>,
    #[serde(default)]
    parent_channel_id: Option<i64>,
    #[serde(default)]
    num_level: Option<i64>,
    #[serde(default)]
    cat_id: Option<TransportText>,
    #[serde(default)]
    client_id: Option<i64>,
    #[serde(default)]
    grouping_id: Option<i64>,
    #[serde(default)]
    sort: Option<i64>,
    #[serde(default)]
    date_create: Option<TransportText>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    category_title: Option<String>,
}

pub fn decode_channels_json_response(json: &str) -> Result<Vec<Channel>, TransportError> {
    let parsed: ChannelsJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .channels
        .into_iter()
        .map(|c| Channel {
            id: c.id,
            title: c.title,
            name: c.name,
            is_active: flag(c.is_active),
            is_visible: flag(c.is_visible),
            is_default_for_channel: flag(c.is_default_for_channel),
            parent_channel_id: c.parent_channel_id.unwrap_or_default(),
            num_level: c.num_level.unwrap_or_default(),
            category_id: text(c.cat_id),
            client_id: c.client_id.unwrap_or_default(),
            grouping_id: c.grouping_id.unwrap_or_default(),
            sort: c.sort.unwrap_or_default(),
            date_create: text(c.date_create),
            created_at: c.created_at,
            updated_at: c.updated_at,
            category_title: c.category_title,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct PlacementsJsonResponse {
    #[serde(default)]
    placements: Vec<PlacementJson>,
}

#[derive(Debug, Deserialize)]
struct PlacementJson {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "isActive")]
    is_active: Option<TransportFlag>,
    #[serde(default, rename = "isVisible")]
    is_visible: Option<TransportFlag>,
    #[serde(default)]
    is_default_for_channel: Option<TransportFlag>,
    #[serde(default)]
    parent_channel_id: Option<i64>,
    #[serde(default)]
    num_level: Option<i64>,
    #[serde(default)]
    cat_id: Option<TransportText>,
    #[serde(default)]
    service_id: Option<i64>,
    #[serde(default)]
    client_id: Option<i64>,
    #[serde(default)]
    grouping_id: Option<i64>,
    #[serde(default)]
    sort: Option<i64>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    channel_id: Option<i64>,
    #[serde(default)]
    channel: Option<PlacementChannelJson>,
}

#[derive(Debug, Deserialize)]
struct PlacementChannelJson {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_id: i64,
}

pub fn decode_placements_json_response(json: &str) -> Result<Vec<Placement>, TransportError> {
    let parsed: PlacementsJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .placements
        .into_iter()
        .map(|p| Placement {
            id: p.id,
            title: p.title,
            name: p.name,
            is_active: flag(p.is_active),
            is_visible: flag(p.is_visible),
            is_default_for_channel: flag(p.is_default_for_channel),
            parent_channel_id: p.parent_channel_id.unwrap_or_default(),
            num_level: p.num_level.unwrap_or_default(),
            category_id: text(p.cat_id),
            service_id: p.service_id,
            client_id: p.client_id.unwrap_or_default(),
            grouping_id: p.grouping_id.unwrap_or_default(),
            sort: p.sort.unwrap_or_default(),
            created_at: p.created_at,
            updated_at: p.updated_at,
            channel_id: p.channel_id.unwrap_or_default(),
            channel: p.channel.map(|c| PlacementChannel {
                id: c.id,
                title: c.title,
                channel_id: c.channel_id,
            }),
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct CampaignsJsonResponse {
    #[serde(default)]
    campaigns: Vec<CampaignJson>,
}

#[derive(Debug, Deserialize)]
struct CampaignJson {
    id: i64,
    #[serde(default)]
    placement_id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

pub fn decode_campaigns_json_response(json: &str) -> Result<Vec<Campaign>, TransportError> {
    let parsed: CampaignsJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .campaigns
        .into_iter()
        .map(|c| Campaign {
            id: c.id,
            placement_id: c.placement_id,
            title: c.title,
            created_at: c.created_at,
            updated_at: c.updated_at,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct AdsJsonResponse {
    #[serde(default)]
    ads: Vec<AdJson>,
}

#[derive(Debug, Deserialize)]
struct AdJson {
    id: i64,
    #[serde(default)]
    external_id: Option<TransportText>,
    #[serde(default)]
    placement_id: i64,
    #[serde(default)]
    campaign_id: i64,
    #[serde(default)]
    external_campaign_id: Option<TransportText>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    text1: Option<String>,
    #[serde(default)]
    text2: Option<String>,
    #[serde(default)]
    preview_url: Option<TransportText>,
    #[serde(default)]
    href: Option<TransportText>,
    #[serde(default)]
    device: Option<TransportText>,
    #[serde(default)]
    created_at: Option<String>,
}

pub fn decode_ads_json_response(json: &str) -> Result<Vec<Ad>, TransportError> {
    let parsed: AdsJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .ads
        .into_iter()
        .map(|a| Ad {
            id: a.id,
            external_id: text(a.external_id).unwrap_or_default(),
            placement_id: a.placement_id,
            campaign_id: a.campaign_id,
            external_campaign_id: text(a.external_campaign_id).unwrap_or_default(),
            kind: a.kind.unwrap_or_default(),
            title: a.title.unwrap_or_default(),
            text: a.text.unwrap_or_default(),
            text1: a.text1.unwrap_or_default(),
            text2: a.text2,
            preview_url: text(a.preview_url),
            href: text(a.href),
            device: text(a.device),
            created_at: a.created_at,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct KeywordsJsonResponse {
    #[serde(default)]
    keywords: Vec<KeywordJson>,
}

#[derive(Debug, Deserialize)]
struct KeywordJson {
    id: i64,
    #[serde(default)]
    keyword: String,
}

pub fn decode_keywords_json_response(json: &str) -> Result<Vec<Keyword>, TransportError> {
    let parsed: KeywordsJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .keywords
        .into_iter()
        .map(|k| Keyword {
            id: k.id,
            keyword: k.keyword,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct CrmCustomFieldsJsonResponse {
    #[serde(default, rename = "crmCustomFields")]
    crm_custom_fields: Vec<CrmCustomFieldJson>,
}

#[derive(Debug, Deserialize)]
struct CrmCustomFieldJson {
    id: i64,
    #[serde(default)]
    crm_account_id: i64,
    #[serde(default)]
    element_type_id: i64,
    #[serde(default)]
    custom_field_title: String,
    #[serde(default)]
    field_type_id: i64,
    #[serde(default)]
    is_multiple: Option<TransportFlag>,
    #[serde(default)]
    group_id: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: i64,
    #[serde(default)]
    is_filter: Option<TransportFlag>,
    #[serde(default)]
    filter_param_id: Option<i64>,
    #[serde(default)]
    default_visibility: Option<TransportFlag>,
}

pub fn decode_crm_custom_fields_json_response(
    json: &str,
) -> Result<Vec<CrmCustomField>, TransportError> {
    let parsed: CrmCustomFieldsJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .crm_custom_fields
        .into_iter()
        .map(|f| CrmCustomField {
            id: f.id,
            crm_account_id: f.crm_account_id,
            element_type_id: f.element_type_id,
            title: f.custom_field_title,
            field_type_id: f.field_type_id,
            is_multiple: flag(f.is_multiple),
            group_id: f.group_id.unwrap_or_default(),
            description: f.description.unwrap_or_default(),
            status: f.status,
            is_filter: flag(f.is_filter),
            filter_param_id: f.filter_param_id.unwrap_or_default(),
            default_visibility: flag(f.default_visibility),
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct CrmCustomFieldGroupsJsonResponse {
    #[serde(default, rename = "crmCustomFieldGroups")]
    crm_custom_field_groups: Vec<CrmCustomFieldGroupJson>,
}

#[derive(Debug, Deserialize)]
struct CrmCustomFieldGroupJson {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    crm_account_id: i64,
    #[serde(default)]
    default_visibility: Option<TransportFlag>,
    #[serde(default)]
    sort: i64,
}

pub fn decode_crm_custom_field_groups_json_response(
    json: &str,
) -> Result<Vec<CrmCustomFieldGroup>, TransportError> {
    let parsed: CrmCustomFieldGroupsJsonResponse = serde_json::from_str(json)?;
    Ok(parsed
        .crm_custom_field_groups
        .into_iter()
        .map(|g| CrmCustomFieldGroup {
            id: g.id,
            title: g.title,
            crm_account_id: g.crm_account_id,
            default_visibility: flag(g.default_visibility),
            sort: g.sort,
        })
        .collect())
}
