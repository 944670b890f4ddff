mod support;

use support::{make_employee, make_usage, setup_db};

#[test]
fn full_outer_join_keeps_unmatched_rows_from_both_sides() {
    let mut db = setup_db();
    let employees = vec![
        make_employee("Jane", "Doe", "jane@x.com"),
        make_employee("Alice", "Smith", "alice@x.com"),
    ];
    let usage = vec![
        make_usage("alice@x.com", "2025-01-06", Some("{'gpt-4': 5}")),
        make_usage("contractor@x.com", "2025-01-06", None),
    ];

    let rows = db.reconcile_records(&employees, &usage).expect("reconcile");

    // 2 + 2 - 1 matched pair
    assert_eq!(rows.len(), 3);

    let jane = &rows[0];
    assert_eq!(jane.name.as_deref(), Some("Jane Doe"));
    assert_eq!(jane.email.as_deref(), Some("jane@x.com"));
    assert_eq!(jane.employee.company.as_deref(), Some("Acme"));
    assert_eq!(jane.usage.cadence, None);
    assert_eq!(jane.usage.is_active, None);
    assert_eq!(jane.model_to_messages, None);

    let alice = &rows[1];
    assert_eq!(alice.name.as_deref(), Some("Alice Smith"));
    assert_eq!(alice.usage.period_start.as_deref(), Some("2025-01-06"));
    assert_eq!(alice.usage.is_active.as_deref(), Some("true"));
    assert_eq!(alice.usage.gpts_messaged.as_deref(), Some("2"));
    assert_eq!(alice.model_to_messages.as_deref(), Some("{'gpt-4': 5}"));

    let contractor = &rows[2];
    assert_eq!(contractor.name.as_deref(), Some("contractor@x.com"));
    assert_eq!(contractor.email.as_deref(), Some("contractor@x.com"));
    assert_eq!(contractor.employee.company, None);
}

#[test]
fn duplicate_emails_produce_cross_product() {
    let mut db = setup_db();
    let employees = vec![
        make_employee("Sam", "One", "sam@x.com"),
        make_employee("Sam", "Two", "sam@x.com"),
    ];
    let usage = vec![
        make_usage("sam@x.com", "2025-01-06", None),
        make_usage("sam@x.com", "2025-01-13", None),
    ];

    let rows = db.reconcile_records(&employees, &usage).expect("reconcile");

    assert_eq!(rows.len(), 4);
    assert!(rows.len() >= employees.len().max(usage.len()));
    assert!(rows.len() <= employees.len() * usage.len());
}

#[test]
fn emails_are_compared_verbatim() {
    let mut db = setup_db();
    let employees = vec![make_employee("Jane", "Doe", "Jane@X.com")];
    let usage = vec![make_usage("jane@x.com", "2025-01-06", None)];

    let rows = db.reconcile_records(&employees, &usage).expect("reconcile");

    assert_eq!(rows.len(), 2);
}

#[test]
fn missing_name_part_falls_back_to_usage_email() {
    let mut db = setup_db();
    let mut employee = make_employee("Lee", "", "lee@x.com");
    employee.last_name = None;
    let usage = vec![make_usage("lee@x.com", "2025-01-06", None)];

    let rows = db
        .reconcile_records(&[employee], &usage)
        .expect("reconcile");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name.as_deref(), Some("lee@x.com"));
}

#[test]
fn null_emails_never_match() {
    let mut db = setup_db();
    let mut employee = make_employee("No", "Email", "");
    employee.email_address = None;
    let mut usage = make_usage("", "2025-01-06", None);
    usage.email = None;

    let rows = db
        .reconcile_records(&[employee], &[usage])
        .expect("reconcile");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name.as_deref(), Some("No Email"));
    assert_eq!(rows[1].name, None);
    assert_eq!(rows[1].email, None);
}

#[test]
fn registering_replaces_previous_rows() {
    let mut db = setup_db();
    db.register_usage(&[make_usage("a@x.com", "2025-01-06", None)])
        .expect("first register");
    let inserted = db
        .register_usage(&[
            make_usage("b@x.com", "2025-01-06", None),
            make_usage("c@x.com", "2025-01-06", None),
        ])
        .expect("second register");

    assert_eq!(inserted, 2);
    let emails = db
        .reconcile()
        .expect("reconcile")
        .into_iter()
        .map(|row| row.email.unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(emails, vec!["b@x.com", "c@x.com"]);
}

#[test]
fn empty_tables_reconcile_to_nothing() {
    let db = setup_db();
    assert!(db.reconcile().expect("reconcile").is_empty());
}

#[test]
fn usage_cells_survive_the_join_verbatim() {
    let mut db = setup_db();
    let mut usage = make_usage("a@x.com", "2025-01-06", None);
    usage.details.is_active = Some("Active".to_string());
    usage.details.gpts_messaged = Some("2.5".to_string());
    usage.details.projects_created = Some("N/A".to_string());

    let rows = db.reconcile_records(&[], &[usage]).expect("reconcile");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].usage.is_active.as_deref(), Some("Active"));
    assert_eq!(rows[0].usage.gpts_messaged.as_deref(), Some("2.5"));
    assert_eq!(rows[0].usage.projects_created.as_deref(), Some("N/A"));
}
