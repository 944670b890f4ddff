#![allow(dead_code)]

use report_core::{EmployeeDetails, EmployeeRecord, UsageDetails, UsageRecord};
use report_db::Db;

pub fn setup_db() -> Db {
    Db::open_in_memory().expect("open db")
}

pub fn make_employee(first: &str, last: &str, email: &str) -> EmployeeRecord {
    EmployeeRecord {
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        email_address: Some(email.to_string()),
        details: EmployeeDetails {
            company: Some("Acme".to_string()),
            department: Some("Engineering".to_string()),
            ..EmployeeDetails::default()
        },
    }
}

pub fn make_usage(email: &str, period_start: &str, mapping: Option<&str>) -> UsageRecord {
    UsageRecord {
        email: Some(email.to_string()),
        model_to_messages: mapping.map(str::to_string),
        details: UsageDetails {
            cadence: Some("weekly".to_string()),
            period_start: Some(period_start.to_string()),
            is_active: Some("true".to_string()),
            gpts_messaged: Some("2".to_string()),
            ..UsageDetails::default()
        },
    }
}
