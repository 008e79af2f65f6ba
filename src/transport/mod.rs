//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod entities;
mod flag;
mod report;

use serde::Deserialize;

pub use entities::{
    TransportError as EntityTransportError, decode_ads_json_response,
    decode_attributions_json_response, decode_campaigns_json_response,
    decode_channels_json_response, decode_crm_custom_field_groups_json_response,
    decode_crm_custom_fields_json_response, decode_groupings_json_response,
    decode_keywords_json_response, decode_metrics_json_response, decode_placements_json_response,
    decode_projects_json_response, encode_crm_id_filter, encode_id_filter,
};
pub use report::{
    TransportError as ReportTransportError, decode_reports_json_response, encode_report_request,
};

#[derive(Debug, Deserialize)]
struct ApiErrorJson {
    error: String,
}

/// Extract the message of a `{"error": "..."}` body, if the body has that shape.
pub fn decode_api_error(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorJson>(body)
        .ok()
        .map(|parsed| parsed.error)
}

#[cfg(test)]
mod tests {
    use super::decode_api_error;

    #[test]
    fn decode_api_error_reads_message() {
        assert_eq!(
            decode_api_error(r#"{"error": "not found"}"#).as_deref(),
            Some("not found")
        );
    }

    #[test]
    fn decode_api_error_rejects_other_shapes() {
        assert_eq!(decode_api_error(""), None);
        assert_eq!(decode_api_error("<html>oops</html>"), None);
        assert_eq!(decode_api_error(r#"{"message": "nope"}"#), None);
        assert_eq!(decode_api_error(r#"{"error": 5}"#), None);
    }
}
