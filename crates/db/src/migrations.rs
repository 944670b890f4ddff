use crate::Db;
use crate::error::Result;

const MIGRATION_0001: &str = include_str!("../migrations/0001_report_tables.sql");

const MIGRATIONS: &[(&str, &str)] = &[("0001_report_tables", MIGRATION_0001)];

impl Db {
    pub fn migrate(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (name, sql) in MIGRATIONS {
            tracing::debug!(migration = name, "applying migration");
            tx.execute_batch(sql)?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::Db;

    fn table_columns(db: &Db, table: &str) -> Vec<String> {
        let mut stmt = db
            .conn
            .prepare(&format!("PRAGMA table_info({})", table))
            .expect("prepare");
        stmt.query_map([], |row| row.get::<_, String>(1))
            .expect("query")
            .collect::<Result<Vec<_>, _>>()
            .expect("columns")
    }

    #[test]
    fn open_creates_report_tables() {
        let db = Db::open_in_memory().expect("open db");

        let usage = table_columns(&db, "usage_table");
        for column in ["email", "model_to_messages", "is_active", "last_day_active"] {
            assert!(usage.iter().any(|name| name == column), "{}", column);
        }

        let employee = table_columns(&db, "employee_table");
        for column in ["first_name", "email_address", "original_hire_date"] {
            assert!(employee.iter().any(|name| name == column), "{}", column);
        }
    }
}
