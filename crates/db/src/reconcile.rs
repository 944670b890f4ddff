use report_core::{EmployeeRecord, ReconciledRecord, UsageRecord};

use crate::Db;
use crate::error::Result;
use crate::helpers::{RECONCILED_COLUMNS, row_to_reconciled};

impl Db {
    /// Full outer join of the registered roster and usage tables on email.
    ///
    /// Emails are compared verbatim. Duplicate emails on either side yield
    /// every matching pair. Roster rows come first in roster order, then
    /// usage rows without a roster match in usage order.
    pub fn reconcile(&self) -> Result<Vec<ReconciledRecord>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM employee_table AS e
            FULL OUTER JOIN usage_table AS u
              ON e.email_address = u.email
            ORDER BY (e.id IS NULL), e.id, u.id
            "#,
            RECONCILED_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_reconciled)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Registers both tables, then joins them.
    pub fn reconcile_records(
        &mut self,
        employees: &[EmployeeRecord],
        usage: &[UsageRecord],
    ) -> Result<Vec<ReconciledRecord>> {
        self.register_employees(employees)?;
        self.register_usage(usage)?;
        let reconciled = self.reconcile()?;
        tracing::debug!(
            employees = employees.len(),
            usage = usage.len(),
            reconciled = reconciled.len(),
            "reconciled roster and usage"
        );
        Ok(reconciled)
    }
}
