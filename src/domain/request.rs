use chrono::NaiveDate;

use crate::domain::validation::ValidationError;
use crate::domain::value::{MetricCode, ProjectCode};

/// Attribution algorithm used to credit touchpoints of a conversion path.
///
/// Each model is sent as its numeric id in `attribution.model_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttributionModel {
    #[default]
    LastClick,
    FirstClick,
    Linear,
    ByPosition,
    FirstCommunication,
    LinearByCommunication,
    LinearWithPostview,
    LastClickWithPostview,
    FirstClickWithPostview,
    NotFirstNotLastClick,
    LastCommunication,
    ByPositionWithPostview,
}

impl AttributionModel {
    pub const ALL: [Self; 12] = [
        Self::LastClick,
        Self::FirstClick,
        Self::Linear,
        Self::ByPosition,
        Self::FirstCommunication,
        Self::LinearByCommunication,
        Self::LinearWithPostview,
        Self::LastClickWithPostview,
        Self::FirstClickWithPostview,
        Self::NotFirstNotLastClick,
        Self::LastCommunication,
        Self::ByPositionWithPostview,
    ];

    /// Numeric id sent as `model_id`.
    pub fn id(self) -> u32 {
        match self {
            Self::LastClick => 1,
            Self::FirstClick => 2,
            Self::Linear => 3,
            Self::ByPosition => 4,
            Self::FirstCommunication => 5,
            Self::LinearByCommunication => 6,
            Self::LinearWithPostview => 10,
            Self::LastClickWithPostview => 15,
            Self::FirstClickWithPostview => 16,
            Self::NotFirstNotLastClick => 17,
            Self::LastCommunication => 22,
            Self::ByPositionWithPostview => 23,
        }
    }

    /// Map a numeric id back to a known model.
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|model| model.id() == id)
    }
}

/// Dimension report rows are grouped by (`groupBy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupBy {
    Ad,
    #[default]
    Day,
    Placement,
    Campaign,
    Object,
}

impl GroupBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ad => "ad_id",
            Self::Day => "day",
            Self::Placement => "placement_id",
            Self::Campaign => "campaigns",
            Self::Object => "smartis_object",
        }
    }
}

/// Whether the report returns raw rows or aggregates (`type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportType {
    Raw,
    #[default]
    Aggregated,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Aggregated => "aggregated",
        }
    }
}

/// Well-known filter categories; their code is used as the filter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCategory {
    SmartisId,
    Channel,
    Placement,
}

impl FilterCategory {
    pub fn code(self) -> u32 {
        match self {
            Self::SmartisId => 7071,
            Self::Channel => 1222,
            Self::Placement => 1223,
        }
    }
}

/// One `filters[]` entry: `name`, `operator`, `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub name: String,
    pub operator: String,
    pub value: String,
}

impl Filter {
    pub fn new(
        name: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// Filter on one of the [`FilterCategory`] dimensions.
    pub fn category(
        category: FilterCategory,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(category.code().to_string(), operator, value)
    }
}

/// Attribution settings of a report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attribution {
    pub model: AttributionModel,
    /// Lookback window in days.
    pub period_days: u32,
    /// Whether direct visits take part in attribution.
    pub with_direct: bool,
}

/// Report request for `reports/getReport`.
///
/// Invariants: at least one metric; `from <= to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    project: ProjectCode,
    metrics: Vec<MetricCode>,
    from: NaiveDate,
    to: NaiveDate,
    group_by: GroupBy,
    report_type: ReportType,
    attribution: Attribution,
    filters: Vec<Filter>,
    fields: Vec<String>,
}

impl Payload {
    /// Create a request for `metrics` over the inclusive day range `from..=to`.
    pub fn new(
        project: ProjectCode,
        metrics: Vec<MetricCode>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if metrics.is_empty() {
            return Err(ValidationError::Empty {
                field: MetricCode::FIELD,
            });
        }
        if from > to {
            return Err(ValidationError::InvalidDateRange { from, to });
        }
        Ok(Self {
            project,
            metrics,
            from,
            to,
            group_by: GroupBy::default(),
            report_type: ReportType::default(),
            attribution: Attribution::default(),
            filters: Vec::new(),
            fields: Vec::new(),
        })
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = group_by;
        self
    }

    pub fn with_report_type(mut self, report_type: ReportType) -> Self {
        self.report_type = report_type;
        self
    }

    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = attribution;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Restrict the returned columns to `fields`.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn project(&self) -> &ProjectCode {
        &self.project
    }

    pub fn metrics(&self) -> &[MetricCode] {
        &self.metrics
    }

    /// First day of the range.
    pub fn date_from(&self) -> NaiveDate {
        self.from
    }

    /// Last day of the range (inclusive).
    pub fn date_to(&self) -> NaiveDate {
        self.to
    }

    pub fn group_by(&self) -> GroupBy {
        self.group_by
    }

    pub fn report_type(&self) -> ReportType {
        self.report_type
    }

    pub fn attribution(&self) -> &Attribution {
        &self.attribution
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}
