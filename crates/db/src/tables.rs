use report_core::{EmployeeRecord, UsageRecord};
use rusqlite::params;

use crate::Db;
use crate::error::Result;

impl Db {
    /// Replaces the contents of `usage_table` with `records`.
    pub fn register_usage(&mut self, records: &[UsageRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0usize;
        {
            tx.execute("DELETE FROM usage_table", [])?;
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO usage_table (
                  email, cadence, period_start, user_status, is_active,
                  first_day_active_in_period, last_day_active_in_period, model_to_messages,
                  gpts_messaged, projects_created, created_or_invited_date, last_day_active
                ) VALUES (
                  ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12
                )
                "#,
            )?;
            for record in records {
                let details = &record.details;
                inserted += stmt.execute(params![
                    record.email,
                    details.cadence,
                    details.period_start,
                    details.user_status,
                    details.is_active,
                    details.first_day_active_in_period,
                    details.last_day_active_in_period,
                    record.model_to_messages,
                    details.gpts_messaged,
                    details.projects_created,
                    details.created_or_invited_date,
                    details.last_day_active,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Replaces the contents of `employee_table` with `records`.
    pub fn register_employees(&mut self, records: &[EmployeeRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0usize;
        {
            tx.execute("DELETE FROM employee_table", [])?;
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO employee_table (
                  first_name, last_name, email_address, company, pbu, department,
                  job_title, location, employee_type, original_hire_date
                ) VALUES (
                  ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10
                )
                "#,
            )?;
            for record in records {
                let details = &record.details;
                inserted += stmt.execute(params![
                    record.first_name,
                    record.last_name,
                    record.email_address,
                    details.company,
                    details.pbu,
                    details.department,
                    details.job_title,
                    details.location,
                    details.employee_type,
                    details.original_hire_date,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }
}
