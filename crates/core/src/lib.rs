use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod expand;
mod model_usage;

pub use expand::{NO_USAGE_MODEL, expand_model_usage};
pub use model_usage::{MessageCount, ModelUsage, parse_model_to_messages};

/// Reporting cadence selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    Weekly,
    Monthly,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }

    /// Storage folder holding this cadence's usage exports.
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownReportType(pub String);

impl fmt::Display for UnknownReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown report type '{}', expected Weekly or Monthly",
            self.0
        )
    }
}

impl std::error::Error for UnknownReportType {}

impl FromStr for ReportType {
    type Err = UnknownReportType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("weekly") {
            Ok(Self::Weekly)
        } else if trimmed.eq_ignore_ascii_case("monthly") {
            Ok(Self::Monthly)
        } else {
            Err(UnknownReportType(value.to_string()))
        }
    }
}

/// Object storage credentials. Read-only for the lifetime of a pipeline run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// Employee columns carried through the join untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDetails {
    pub company: Option<String>,
    pub pbu: Option<String>,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub employee_type: Option<String>,
    pub original_hire_date: Option<String>,
}

/// Usage columns other than `email` and `model_to_messages`, kept as the
/// export wrote them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageDetails {
    pub cadence: Option<String>,
    pub period_start: Option<String>,
    pub user_status: Option<String>,
    pub is_active: Option<String>,
    pub first_day_active_in_period: Option<String>,
    pub last_day_active_in_period: Option<String>,
    pub gpts_messaged: Option<String>,
    pub projects_created: Option<String>,
    pub created_or_invited_date: Option<String>,
    pub last_day_active: Option<String>,
}

/// One usage export row (one user, one reporting period).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub email: Option<String>,
    pub model_to_messages: Option<String>,
    #[serde(flatten)]
    pub details: UsageDetails,
}

/// One roster row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    #[serde(flatten)]
    pub details: EmployeeDetails,
}

/// Full-outer-join output of roster and usage rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub employee: EmployeeDetails,
    #[serde(flatten)]
    pub usage: UsageDetails,
    pub model_to_messages: Option<String>,
}

/// One row per (user, model) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub employee: EmployeeDetails,
    #[serde(flatten)]
    pub usage: UsageDetails,
    pub model: String,
    pub message_count: u64,
}

/// Display order of the final table.
pub const REPORT_COLUMNS: [&str; 21] = [
    "name",
    "email",
    "company",
    "pbu",
    "department",
    "job_title",
    "location",
    "employee_type",
    "original_hire_date",
    "cadence",
    "period_start",
    "user_status",
    "is_active",
    "first_day_active_in_period",
    "last_day_active_in_period",
    "gpts_messaged",
    "projects_created",
    "created_or_invited_date",
    "last_day_active",
    "model",
    "message_count",
];

impl ExpandedRecord {
    /// Cell values in `REPORT_COLUMNS` order; `None` renders as an empty cell.
    pub fn cells(&self) -> Vec<Option<String>> {
        let employee = &self.employee;
        let usage = &self.usage;
        vec![
            self.name.clone(),
            self.email.clone(),
            employee.company.clone(),
            employee.pbu.clone(),
            employee.department.clone(),
            employee.job_title.clone(),
            employee.location.clone(),
            employee.employee_type.clone(),
            employee.original_hire_date.clone(),
            usage.cadence.clone(),
            usage.period_start.clone(),
            usage.user_status.clone(),
            usage.is_active.clone(),
            usage.first_day_active_in_period.clone(),
            usage.last_day_active_in_period.clone(),
            usage.gpts_messaged.clone(),
            usage.projects_created.clone(),
            usage.created_or_invited_date.clone(),
            usage.last_day_active.clone(),
            Some(self.model.clone()),
            Some(self.message_count.to_string()),
        ]
    }
}

/// Final pipeline result for one report type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub report_type: ReportType,
    pub loaded_at: String,
    pub rows: Vec<ExpandedRecord>,
}

impl ReportTable {
    pub fn new(report_type: ReportType, loaded_at: String, rows: Vec<ExpandedRecord>) -> Self {
        Self {
            report_type,
            loaded_at,
            rows,
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &REPORT_COLUMNS
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_type_parses_case_insensitively() {
        assert_eq!("Weekly".parse::<ReportType>(), Ok(ReportType::Weekly));
        assert_eq!(" monthly ".parse::<ReportType>(), Ok(ReportType::Monthly));
        assert!("Daily".parse::<ReportType>().is_err());
    }

    #[test]
    fn report_type_round_trips_through_display() {
        for report_type in [ReportType::Weekly, ReportType::Monthly] {
            assert_eq!(report_type.to_string().parse::<ReportType>(), Ok(report_type));
        }
    }

    #[test]
    fn report_type_maps_to_folder() {
        assert_eq!(ReportType::Weekly.folder(), "weekly");
        assert_eq!(ReportType::Monthly.folder(), "monthly");
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let creds = Credentials {
            access_key_id: "AKIA123".to_string(),
            secret_access_key: "super-secret".to_string(),
            region: "us-east-1".to_string(),
            bucket: "reports".to_string(),
        };
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("AKIA123"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn cells_follow_column_order() {
        let record = ExpandedRecord {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            usage: UsageDetails {
                is_active: Some("true".to_string()),
                gpts_messaged: Some("3".to_string()),
                ..UsageDetails::default()
            },
            model: "gpt-4".to_string(),
            message_count: 5,
            ..ExpandedRecord::default()
        };
        let cells = record.cells();
        assert_eq!(cells.len(), REPORT_COLUMNS.len());
        let position = |column: &str| {
            REPORT_COLUMNS
                .iter()
                .position(|name| *name == column)
                .expect("column")
        };
        assert_eq!(cells[position("name")].as_deref(), Some("Jane Doe"));
        assert_eq!(cells[position("is_active")].as_deref(), Some("true"));
        assert_eq!(cells[position("gpts_messaged")].as_deref(), Some("3"));
        assert_eq!(cells[position("model")].as_deref(), Some("gpt-4"));
        assert_eq!(cells[position("message_count")].as_deref(), Some("5"));
        assert_eq!(cells[position("company")], None);
    }

    #[test]
    fn expanded_record_serializes_flat() {
        let record = ExpandedRecord {
            name: Some("bob@x.com".to_string()),
            model: "none".to_string(),
            ..ExpandedRecord::default()
        };
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["name"], "bob@x.com");
        assert_eq!(value["model"], "none");
        assert_eq!(value["message_count"], 0);
        assert!(value.get("cadence").is_some());
        assert!(value.get("usage").is_none());
    }
}
