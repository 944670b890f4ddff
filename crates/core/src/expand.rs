use crate::model_usage::parse_model_to_messages;
use crate::{ExpandedRecord, ReconciledRecord};

/// Model label given to rows with no parsed usage.
pub const NO_USAGE_MODEL: &str = "none";

/// Explodes each reconciled row into one row per model in its
/// `model_to_messages` mapping.
///
/// Rows whose mapping is absent, empty or unparseable produce exactly one
/// row with model `"none"` and a zero count. Rows with usage are emitted
/// first, followed by the rows without usage, each group in input order.
pub fn expand_model_usage(records: Vec<ReconciledRecord>) -> Vec<ExpandedRecord> {
    let mut active = Vec::with_capacity(records.len());
    let mut inactive = Vec::new();
    for record in records {
        let usage = parse_model_to_messages(record.model_to_messages.as_deref());
        let ReconciledRecord {
            name,
            email,
            employee,
            usage: details,
            model_to_messages: _,
        } = record;
        if usage.is_empty() {
            inactive.push(ExpandedRecord {
                name,
                email,
                employee,
                usage: details,
                model: NO_USAGE_MODEL.to_string(),
                message_count: 0,
            });
            continue;
        }
        for (model, count) in usage {
            active.push(ExpandedRecord {
                name: name.clone(),
                email: email.clone(),
                employee: employee.clone(),
                usage: details.clone(),
                model,
                message_count: count.coerce(),
            });
        }
    }
    active.append(&mut inactive);
    active
}
