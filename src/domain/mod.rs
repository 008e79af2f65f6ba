//! Domain layer: strong types with validation and invariants (no I/O).

mod entity;
mod report;
mod request;
mod validation;
mod value;

pub use entity::{
    Ad, AttributionDescriptor, Campaign, Channel, CrmCustomField, CrmCustomFieldGroup, Grouping,
    Keyword, Metric, Placement, PlacementChannel, Project, ProjectField,
};
pub use report::{Cell, CellKind, CellValue, Report, Row, classify};
pub use request::{
    Attribution, AttributionModel, Filter, FilterCategory, GroupBy, Payload, ReportType,
};
pub use validation::ValidationError;
pub use value::{ApiKey, BaseUrl, CrmToken, MetricCode, ProjectCode};

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn metrics() -> Vec<MetricCode> {
        vec![MetricCode::new("cost").unwrap()]
    }

    #[test]
    fn api_key_rejects_empty() {
        assert!(matches!(
            ApiKey::new("   "),
            Err(ValidationError::Empty {
                field: ApiKey::FIELD
            })
        ));
        assert_eq!(ApiKey::new(" key ").unwrap().as_str(), "key");
    }

    #[test]
    fn crm_token_rejects_empty() {
        assert!(matches!(
            CrmToken::new(""),
            Err(ValidationError::Empty {
                field: CrmToken::FIELD
            })
        ));
    }

    #[test]
    fn metric_code_rejects_separator() {
        assert!(matches!(
            MetricCode::new("cost;visits"),
            Err(ValidationError::InvalidMetricCode { .. })
        ));
    }

    #[test]
    fn base_url_is_normalised_with_trailing_slash() {
        let url = BaseUrl::parse("https://example.invalid/api").unwrap();
        assert_eq!(url.as_str(), "https://example.invalid/api/");
        assert_eq!(
            BaseUrl::parse("https://example.invalid/").unwrap().as_str(),
            "https://example.invalid/"
        );

        assert!(BaseUrl::parse("not a url").is_err());
        assert!(BaseUrl::parse("ftp://example.invalid/").is_err());
    }

    #[test]
    fn payload_requires_metrics() {
        let project = ProjectCode::new("object_1").unwrap();
        let err = Payload::new(project, Vec::new(), day(1), day(2)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Empty {
                field: MetricCode::FIELD
            }
        );
    }

    #[test]
    fn payload_rejects_inverted_range() {
        let project = ProjectCode::new("object_1").unwrap();
        let err = Payload::new(project, metrics(), day(3), day(2)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDateRange { .. }));
    }

    #[test]
    fn payload_accepts_single_day_range() {
        let project = ProjectCode::new("object_1").unwrap();
        let payload = Payload::new(project, metrics(), day(2), day(2)).unwrap();
        assert_eq!(payload.date_from(), payload.date_to());
        assert_eq!(payload.group_by(), GroupBy::Day);
        assert_eq!(payload.report_type(), ReportType::Aggregated);
        assert!(payload.filters().is_empty());
    }

    #[test]
    fn attribution_model_ids_round_trip() {
        for model in AttributionModel::ALL {
            assert_eq!(AttributionModel::from_id(model.id()), Some(model));
        }
        assert_eq!(AttributionModel::from_id(7), None);
        assert_eq!(AttributionModel::ByPositionWithPostview.id(), 23);
    }

    #[test]
    fn filter_category_uses_code_as_name() {
        let filter = Filter::category(FilterCategory::Channel, "=", "12");
        assert_eq!(filter.name, "1222");
        assert_eq!(filter.operator, "=");
        assert_eq!(filter.value, "12");
    }

    #[test]
    fn attribution_descriptor_maps_to_known_model() {
        let descriptor = AttributionDescriptor {
            id: 22,
            title: "Last communication".to_owned(),
            about: String::new(),
            is_system: true,
        };
        assert_eq!(descriptor.model(), Some(AttributionModel::LastCommunication));
    }
}
