use serde::{Deserialize, Serialize};

use crate::domain::{Cell, CellValue, Filter, Payload, Report, Row};

const DATE_FORMAT: &str = "%Y-%m-%d";
const METRIC_SEPARATOR: &str = ";";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contains no reports")]
    NoData,

    #[error("`reports` is not an object of metric rows")]
    ReportsNotObject,

    #[error("report `{metric}` is not a list of rows")]
    RowsNotArray { metric: String },

    #[error("report `{metric}` row {row} is not an object")]
    RowNotObject { metric: String, row: usize },

    #[error("report `{metric}` row {row} column `{column}` is not a scalar")]
    NonScalarValue {
        metric: String,
        row: usize,
        column: String,
    },
}

#[derive(Debug, Serialize)]
struct ReportRequestJson<'a> {
    project: &'a str,
    metrics: String,
    #[serde(rename = "datetimeFrom")]
    datetime_from: String,
    #[serde(rename = "datetimeTo")]
    datetime_to: String,
    #[serde(rename = "groupBy")]
    group_by: &'static str,
    #[serde(rename = "type")]
    report_type: &'static str,
    attribution: AttributionJson,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    filters: Vec<FilterJson<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct AttributionJson {
    model_id: u32,
    period: u32,
    with_direct: bool,
}

#[derive(Debug, Serialize)]
struct FilterJson<'a> {
    name: &'a str,
    operator: &'a str,
    value: &'a str,
}

impl<'a> From<&'a Filter> for FilterJson<'a> {
    fn from(value: &'a Filter) -> Self {
        Self {
            name: &value.name,
            operator: &value.operator,
            value: &value.value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReportsJsonResponse {
    #[serde(default)]
    reports: serde_json::Value,
    #[serde(default, rename = "metaInfo")]
    meta_info: Option<MetaInfoJson>,
    #[serde(default)]
    warnings: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MetaInfoJson {
    #[serde(default)]
    worktime: Option<serde_json::Number>,
}

pub fn encode_report_request(payload: &Payload) -> Result<Vec<u8>, serde_json::Error> {
    let metrics = payload
        .metrics()
        .iter()
        .map(|metric| metric.as_str())
        .collect::<Vec<_>>()
        .join(METRIC_SEPARATOR);
    let attribution = payload.attribution();

    serde_json::to_vec(&ReportRequestJson {
        project: payload.project().as_str(),
        metrics,
        datetime_from: payload.date_from().format(DATE_FORMAT).to_string(),
        datetime_to: payload.date_to().format(DATE_FORMAT).to_string(),
        group_by: payload.group_by().as_str(),
        report_type: payload.report_type().as_str(),
        attribution: AttributionJson {
            model_id: attribution.model.id(),
            period: attribution.period_days,
            with_direct: attribution.with_direct,
        },
        filters: payload.filters().iter().map(FilterJson::from).collect(),
        fields: payload.fields().iter().map(String::as_str).collect(),
    })
}

/// Build one [`Report`] per metric key of the `reports` object.
///
/// Fails as a whole if any row is malformed. A missing, `null`, `{}` or `[]`
/// `reports` value is [`TransportError::NoData`].
pub fn decode_reports_json_response(json: &str) -> Result<Vec<Report>, TransportError> {
    let parsed: ReportsJsonResponse = serde_json::from_str(json)?;

    if !parsed.warnings.is_empty() {
        tracing::warn!(warnings = ?parsed.warnings, "report request returned warnings");
    }
    if let Some(worktime) = parsed.meta_info.and_then(|meta| meta.worktime) {
        tracing::debug!(%worktime, "report built by server");
    }

    let reports = match parsed.reports {
        serde_json::Value::Object(reports) => reports,
        serde_json::Value::Null => return Err(TransportError::NoData),
        // PHP encodes an empty associative array as `[]`.
        serde_json::Value::Array(list) if list.is_empty() => return Err(TransportError::NoData),
        _ => return Err(TransportError::ReportsNotObject),
    };
    if reports.is_empty() {
        return Err(TransportError::NoData);
    }

    reports
        .into_iter()
        .map(|(metric, rows)| build_report(metric, rows))
        .collect()
}

fn build_report(metric: String, rows: serde_json::Value) -> Result<Report, TransportError> {
    let serde_json::Value::Array(rows) = rows else {
        return Err(TransportError::RowsNotArray { metric });
    };

    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| build_row(&metric, idx, row))
        .collect::<Result<Vec<Row>, TransportError>>()?;

    Ok(Report::new(metric, rows))
}

fn build_row(metric: &str, idx: usize, row: serde_json::Value) -> Result<Row, TransportError> {
    let serde_json::Value::Object(columns) = row else {
        return Err(TransportError::RowNotObject {
            metric: metric.to_owned(),
            row: idx,
        });
    };

    let cells = columns
        .into_iter()
        .map(|(column, value)| {
            let value = cell_value(value).ok_or_else(|| TransportError::NonScalarValue {
                metric: metric.to_owned(),
                row: idx,
                column: column.clone(),
            })?;
            Ok(Cell::new(column, value))
        })
        .collect::<Result<Vec<Cell>, TransportError>>()?;

    Ok(Row::new(cells))
}

fn cell_value(value: serde_json::Value) -> Option<CellValue> {
    match value {
        serde_json::Value::Null => Some(CellValue::Null),
        serde_json::Value::Bool(value) => Some(CellValue::Bool(value)),
        serde_json::Value::Number(value) => Some(CellValue::Number(value)),
        serde_json::Value::String(value) => Some(CellValue::String(value)),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{
        Attribution, AttributionModel, CellKind, FilterCategory, GroupBy, MetricCode, ProjectCode,
        ReportType,
    };

    fn payload() -> Payload {
        Payload::new(
            ProjectCode::new("object_1").unwrap(),
            vec![
                MetricCode::new("cost").unwrap(),
                MetricCode::new("visits").unwrap(),
            ],
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    fn encode(payload: &Payload) -> serde_json::Value {
        serde_json::from_slice(&encode_report_request(payload).unwrap()).unwrap()
    }

    #[test]
    fn encode_report_request_uses_wire_names() {
        let payload = payload()
            .with_group_by(GroupBy::Campaign)
            .with_report_type(ReportType::Raw)
            .with_attribution(Attribution {
                model: AttributionModel::FirstClick,
                period_days: 90,
                with_direct: true,
            });

        assert_eq!(
            encode(&payload),
            serde_json::json!({
                "project": "object_1",
                "metrics": "cost;visits",
                "datetimeFrom": "2024-01-01",
                "datetimeTo": "2024-01-31",
                "groupBy": "campaigns",
                "type": "raw",
                "attribution": {"model_id": 2, "period": 90, "with_direct": true},
            })
        );
    }

    #[test]
    fn encode_report_request_includes_non_empty_filters_and_fields() {
        let payload = payload()
            .with_filter(Filter::category(FilterCategory::Placement, "=", "7"))
            .with_fields(["day", "field_10_x"]);

        let json = encode(&payload);
        assert_eq!(
            json["filters"],
            serde_json::json!([{"name": "1223", "operator": "=", "value": "7"}])
        );
        assert_eq!(json["fields"], serde_json::json!(["day", "field_10_x"]));
    }

    #[test]
    fn decode_builds_one_report_per_metric() {
        let json = r#"
        {
          "reports": {
            "cost": [
              {"field_10_x": 5, "day": "2024-01-01", "field_cf_group_42_y": null},
              {"field_10_x": 7.5, "day": "2024-01-02", "field_cf_group_42_y": "a"}
            ],
            "visits": []
          },
          "metaInfo": {"worktime": 12},
          "warnings": []
        }
        "#;

        let mut reports = decode_reports_json_response(json).unwrap();
        reports.sort_by(|a, b| a.metric().cmp(b.metric()));
        assert_eq!(reports.len(), 2);

        let cost = &reports[0];
        assert_eq!(cost.metric(), "cost");
        assert_eq!(cost.rows().len(), 2);
        assert!(!cost.is_names_resolved());
        assert!(!cost.is_indexed());

        let row = &cost.rows()[0];
        assert_eq!(row.len(), 3);
        let field = row.column("field_10_x").unwrap();
        assert_eq!(field.kind(), CellKind::CustomField);
        assert_eq!(field.value().as_i64(), Some(5));
        let group = row.column("field_cf_group_42_y").unwrap();
        assert_eq!(group.kind(), CellKind::CustomFieldGroup);
        assert_eq!(group.clean_id(), Some("42"));
        assert!(group.value().is_null());
        assert!(row.cells().iter().all(|cell| cell.name().is_empty()));

        let visits = &reports[1];
        assert_eq!(visits.metric(), "visits");
        assert!(visits.is_empty());
    }

    #[test]
    fn decode_then_index_gives_typed_lookup() {
        let json = r#"{"reports": {"cost": [{"field_10_x": 5, "day": "2024-01-01"}]}}"#;

        let mut reports = decode_reports_json_response(json).unwrap();
        let report = &mut reports[0];
        report.index_columns();

        let row = &report.rows()[0];
        assert_eq!(row.column("field_10_x").unwrap().value(), &CellValue::from(5));
        assert_eq!(
            row.column("day").unwrap().value(),
            &CellValue::from("2024-01-01")
        );
    }

    #[test]
    fn decode_keeps_string_and_number_distinct() {
        let json = r#"{"reports": {"cost": [{"a": "5", "b": 5, "c": true}]}}"#;
        let reports = decode_reports_json_response(json).unwrap();
        let row = &reports[0].rows()[0];
        assert_eq!(row.column("a").unwrap().value().as_str(), Some("5"));
        assert_eq!(row.column("b").unwrap().value().as_i64(), Some(5));
        assert_eq!(row.column("c").unwrap().value().as_bool(), Some(true));
    }

    #[test]
    fn decode_empty_reports_is_no_data() {
        let err = decode_reports_json_response(r#"{"reports": {}}"#).unwrap_err();
        assert!(matches!(err, TransportError::NoData));

        let err = decode_reports_json_response("{}").unwrap_err();
        assert!(matches!(err, TransportError::NoData));
    }

    #[test]
    fn decode_empty_list_or_null_reports_is_no_data() {
        let err = decode_reports_json_response(r#"{"reports": []}"#).unwrap_err();
        assert!(matches!(err, TransportError::NoData));

        let err = decode_reports_json_response(r#"{"reports": null}"#).unwrap_err();
        assert!(matches!(err, TransportError::NoData));
    }

    #[test]
    fn decode_non_empty_reports_list_is_rejected() {
        let err = decode_reports_json_response(r#"{"reports": [{"day": 1}]}"#).unwrap_err();
        assert!(matches!(err, TransportError::ReportsNotObject));

        let err = decode_reports_json_response(r#"{"reports": "cost"}"#).unwrap_err();
        assert!(matches!(err, TransportError::ReportsNotObject));
    }

    #[test]
    fn decode_rejects_non_object_rows() {
        let json = r#"{"reports": {"cost": [{"day": "2024-01-01"}, 5]}}"#;
        let err = decode_reports_json_response(json).unwrap_err();
        assert!(matches!(
            err,
            TransportError::RowNotObject { ref metric, row: 1 } if metric == "cost"
        ));
    }

    #[test]
    fn decode_rejects_rows_that_are_not_arrays() {
        let json = r#"{"reports": {"cost": {"day": "2024-01-01"}}}"#;
        let err = decode_reports_json_response(json).unwrap_err();
        assert!(matches!(err, TransportError::RowsNotArray { .. }));
    }

    #[test]
    fn decode_rejects_nested_values() {
        let json = r#"{"reports": {"cost": [{"day": ["2024-01-01"]}]}}"#;
        let err = decode_reports_json_response(json).unwrap_err();
        assert!(matches!(
            err,
            TransportError::NonScalarValue { ref column, .. } if column == "day"
        ));
    }

    #[test]
    fn decode_rejects_invalid_json() {
        let err = decode_reports_json_response("{ not json }").unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }
}
