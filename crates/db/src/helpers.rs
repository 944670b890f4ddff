use report_core::{EmployeeDetails, ReconciledRecord, UsageDetails};
use rusqlite::Row;

pub(crate) const RECONCILED_COLUMNS: &str = r#"
    COALESCE(e.first_name || ' ' || e.last_name, u.email) AS name,
    COALESCE(e.email_address, u.email) AS email,
    e.company, e.pbu, e.department, e.job_title, e.location, e.employee_type,
    e.original_hire_date,
    u.cadence, u.period_start, u.user_status, u.is_active,
    u.first_day_active_in_period, u.last_day_active_in_period, u.gpts_messaged,
    u.projects_created, u.created_or_invited_date, u.last_day_active,
    u.model_to_messages
"#;

pub(crate) fn row_to_reconciled(
    row: &Row<'_>,
) -> std::result::Result<ReconciledRecord, rusqlite::Error> {
    Ok(ReconciledRecord {
        name: row.get(0)?,
        email: row.get(1)?,
        employee: EmployeeDetails {
            company: row.get(2)?,
            pbu: row.get(3)?,
            department: row.get(4)?,
            job_title: row.get(5)?,
            location: row.get(6)?,
            employee_type: row.get(7)?,
            original_hire_date: row.get(8)?,
        },
        usage: UsageDetails {
            cadence: row.get(9)?,
            period_start: row.get(10)?,
            user_status: row.get(11)?,
            is_active: row.get(12)?,
            first_day_active_in_period: row.get(13)?,
            last_day_active_in_period: row.get(14)?,
            gpts_messaged: row.get(15)?,
            projects_created: row.get(16)?,
            created_or_invited_date: row.get(17)?,
            last_day_active: row.get(18)?,
        },
        model_to_messages: row.get(19)?,
    })
}
