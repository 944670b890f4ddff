use report_core::{EmployeeDetails, EmployeeRecord};
use tracing::info;

use crate::paths::roster_glob;
use crate::session::Session;
use crate::types::Result;

/// Roster header names and the field each one is renamed to.
pub const ROSTER_COLUMNS: [(&str, &str); 10] = [
    ("First Name", "first_name"),
    ("Last Name", "last_name"),
    ("Email Address", "email_address"),
    ("Company", "company"),
    ("PBU", "pbu"),
    ("Department", "department"),
    ("Job Title", "job_title"),
    ("Location", "location"),
    ("Employee Type", "employee_type"),
    ("Original Hire Date", "original_hire_date"),
];

/// Reads `<bucket>/employee_info/*.csv`. Independent of the report type.
pub fn load_roster(session: &Session) -> Result<Vec<EmployeeRecord>> {
    let glob = roster_glob(session.bucket())?;
    let scan = session.read_csv(&glob)?;
    let headers = ROSTER_COLUMNS.map(|(header, _)| header);
    let records = scan
        .project(&headers)?
        .into_iter()
        .map(employee_from_row)
        .collect::<Vec<_>>();
    info!(
        rows = records.len(),
        files = scan.stats.files_read,
        "loaded employee records"
    );
    Ok(records)
}

fn employee_from_row(row: Vec<Option<String>>) -> EmployeeRecord {
    let mut cells = row.into_iter();
    let mut next = || cells.next().flatten();
    EmployeeRecord {
        first_name: next(),
        last_name: next(),
        email_address: next(),
        details: EmployeeDetails {
            company: next(),
            pbu: next(),
            department: next(),
            job_title: next(),
            location: next(),
            employee_type: next(),
            original_hire_date: next(),
        },
    }
}
