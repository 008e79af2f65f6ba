use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidDateRange { from: NaiveDate, to: NaiveDate },
    InvalidBaseUrl { input: String },
    InvalidMetricCode { input: String },
    InvalidTimeout { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidDateRange { from, to } => {
                write!(f, "invalid date range: {from} is after {to}")
            }
            Self::InvalidBaseUrl { input } => write!(f, "invalid base url: {input}"),
            Self::InvalidMetricCode { input } => {
                write!(f, "invalid metric code (contains `;`): {input}")
            }
            Self::InvalidTimeout { input } => {
                write!(f, "invalid timeout (expected whole seconds): {input}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "project" };
        assert_eq!(err.to_string(), "project must not be empty");

        let err = ValidationError::InvalidDateRange {
            from: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "invalid date range: 2024-02-01 is after 2024-01-01"
        );

        let err = ValidationError::InvalidBaseUrl {
            input: "nope".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid base url: nope");

        let err = ValidationError::InvalidMetricCode {
            input: "a;b".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid metric code (contains `;`): a;b");

        let err = ValidationError::InvalidTimeout {
            input: "soon".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid timeout (expected whole seconds): soon"
        );
    }
}
