use report_core::{ReportType, UsageDetails, UsageRecord};
use tracing::info;

use crate::paths::usage_glob;
use crate::session::Session;
use crate::types::Result;

/// Columns projected from every usage export, in record order.
pub const USAGE_COLUMNS: [&str; 12] = [
    "email",
    "cadence",
    "period_start",
    "user_status",
    "is_active",
    "first_day_active_in_period",
    "last_day_active_in_period",
    "model_to_messages",
    "gpts_messaged",
    "projects_created",
    "created_or_invited_date",
    "last_day_active",
];

/// Reads `<bucket>/<weekly|monthly>/*.csv`, one record per source row.
pub fn load_usage(session: &Session, report_type: ReportType) -> Result<Vec<UsageRecord>> {
    let glob = usage_glob(session.bucket(), report_type)?;
    let scan = session.read_csv(&glob)?;
    let records = scan
        .project(&USAGE_COLUMNS)?
        .into_iter()
        .map(usage_from_row)
        .collect::<Vec<_>>();
    info!(
        report_type = %report_type,
        rows = records.len(),
        files = scan.stats.files_read,
        "loaded usage records"
    );
    Ok(records)
}

fn usage_from_row(row: Vec<Option<String>>) -> UsageRecord {
    let mut cells = row.into_iter();
    let mut next = || cells.next().flatten();
    let email = next();
    let cadence = next();
    let period_start = next();
    let user_status = next();
    let is_active = next();
    let first_day_active_in_period = next();
    let last_day_active_in_period = next();
    let model_to_messages = next();
    let gpts_messaged = next();
    let projects_created = next();
    let created_or_invited_date = next();
    let last_day_active = next();
    UsageRecord {
        email,
        model_to_messages,
        details: UsageDetails {
            cadence,
            period_start,
            user_status,
            is_active,
            first_day_active_in_period,
            last_day_active_in_period,
            gpts_messaged,
            projects_created,
            created_or_invited_date,
            last_day_active,
        },
    }
}
