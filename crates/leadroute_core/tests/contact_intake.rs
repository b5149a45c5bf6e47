use leadroute_core::db::{open_db, open_db_in_memory};
use leadroute_core::{
    AdminService, ContactReportRow, ContactRequest, IntakeService, NewOperator, NewSource,
    RecordRef, RepoError, ValidationError, WeightInput,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn request(external_id: &str, source_id: i64, text: Option<&str>) -> ContactRequest {
    ContactRequest {
        external_id: external_id.to_string(),
        source_id,
        text: text.map(str::to_string),
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn alice_reaches_lifetime_limit_after_two_contacts() {
    let conn = open_db_in_memory().unwrap();
    let admin = AdminService::new(&conn);
    let alice = admin
        .create_operator(&NewOperator {
            name: "Alice".to_string(),
            active: true,
            load_limit: 2,
        })
        .unwrap();
    let web = admin
        .create_source(&NewSource {
            name: "web".to_string(),
        })
        .unwrap();
    admin
        .assign_weights(
            web.id,
            &[WeightInput {
                operator_id: alice.id,
                weight: 1,
            }],
        )
        .unwrap();

    let intake = IntakeService::new(&conn);
    let mut rng = StdRng::seed_from_u64(11);

    let first = intake
        .create_contact(&request("lead-1", web.id, Some("hello")), &mut rng)
        .unwrap();
    let second = intake
        .create_contact(&request("lead-2", web.id, None), &mut rng)
        .unwrap();
    let third = intake
        .create_contact(&request("lead-3", web.id, None), &mut rng)
        .unwrap();

    assert_eq!(first.operator.as_deref(), Some("Alice"));
    assert_eq!(second.operator.as_deref(), Some("Alice"));
    assert_eq!(third.operator, None);

    let contacts = admin.list_contacts().unwrap();
    assert_eq!(contacts.len(), 3);
    assert_eq!(contacts[0].operator_id, Some(alice.id));
    assert_eq!(contacts[0].text.as_deref(), Some("hello"));
    assert_eq!(contacts[2].operator_id, None);
}

#[test]
fn same_external_id_reuses_one_lead_across_sources() {
    let conn = open_db_in_memory().unwrap();
    let admin = AdminService::new(&conn);
    let web = admin
        .create_source(&NewSource {
            name: "web".to_string(),
        })
        .unwrap();
    let phone = admin
        .create_source(&NewSource {
            name: "phone".to_string(),
        })
        .unwrap();

    let intake = IntakeService::new(&conn);
    let mut rng = StdRng::seed_from_u64(12);
    let first = intake
        .create_contact(&request("ext-42", web.id, None), &mut rng)
        .unwrap();
    let second = intake
        .create_contact(&request("ext-42", phone.id, None), &mut rng)
        .unwrap();

    assert_eq!(first.lead_id, second.lead_id);
    assert_ne!(first.contact_id, second.contact_id);
    assert_eq!(count(&conn, "leads"), 1);
    assert_eq!(count(&conn, "contacts"), 2);

    let contacts = admin.list_contacts().unwrap();
    assert!(contacts.iter().all(|contact| contact.lead_id == first.lead_id));
}

#[test]
fn unknown_source_is_rejected_without_writes() {
    let conn = open_db_in_memory().unwrap();
    let intake = IntakeService::new(&conn);
    let mut rng = StdRng::seed_from_u64(13);

    let err = intake
        .create_contact(&request("ext-1", 55, None), &mut rng)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(RecordRef::Source(55))));
    assert_eq!(count(&conn, "leads"), 0);
    assert_eq!(count(&conn, "contacts"), 0);
}

#[test]
fn blank_external_id_is_a_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let intake = IntakeService::new(&conn);
    let mut rng = StdRng::seed_from_u64(14);

    let err = intake
        .create_contact(&request("   ", 1, None), &mut rng)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankExternalId)
    ));
}

#[test]
fn contact_without_eligible_operator_is_still_recorded() {
    let conn = open_db_in_memory().unwrap();
    let admin = AdminService::new(&conn);
    let web = admin
        .create_source(&NewSource {
            name: "web".to_string(),
        })
        .unwrap();

    let receipt = IntakeService::new(&conn)
        .create_contact(
            &request("ext-9", web.id, Some("call me")),
            &mut StdRng::seed_from_u64(15),
        )
        .unwrap();

    assert_eq!(receipt.operator, None);
    assert_eq!(
        admin.report().unwrap(),
        vec![ContactReportRow {
            contact_id: receipt.contact_id,
            lead_id: receipt.lead_id,
            source: Some("web".to_string()),
            operator: None,
        }]
    );
}

#[test]
fn report_resolves_source_and_operator_names() {
    let conn = open_db_in_memory().unwrap();
    let admin = AdminService::new(&conn);
    let bob = admin.create_operator(&NewOperator::named("Bob")).unwrap();
    let web = admin
        .create_source(&NewSource {
            name: "web".to_string(),
        })
        .unwrap();
    admin
        .assign_weights(
            web.id,
            &[WeightInput {
                operator_id: bob.id,
                weight: 3,
            }],
        )
        .unwrap();

    let receipt = IntakeService::new(&conn)
        .create_contact(&request("ext-5", web.id, None), &mut StdRng::seed_from_u64(16))
        .unwrap();

    let report = admin.report().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].contact_id, receipt.contact_id);
    assert_eq!(report[0].source.as_deref(), Some("web"));
    assert_eq!(report[0].operator.as_deref(), Some("Bob"));
    assert_eq!(admin.list_leads().unwrap()[0].external_id, "ext-5");
}

#[test]
fn concurrent_intakes_never_exceed_load_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routing.db");

    let conn = open_db(&path).unwrap();
    let admin = AdminService::new(&conn);
    let alice = admin
        .create_operator(&NewOperator {
            name: "Alice".to_string(),
            active: true,
            load_limit: 3,
        })
        .unwrap();
    let web = admin
        .create_source(&NewSource {
            name: "web".to_string(),
        })
        .unwrap();
    admin
        .assign_weights(
            web.id,
            &[WeightInput {
                operator_id: alice.id,
                weight: 1,
            }],
        )
        .unwrap();
    let source_id = web.id;
    drop(conn);

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let path = path.clone();
            std::thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let mut rng = StdRng::seed_from_u64(worker);
                IntakeService::new(&conn)
                    .create_contact(&request(&format!("lead-{worker}"), source_id, None), &mut rng)
                    .unwrap()
            })
        })
        .collect();

    let assigned = workers
        .into_iter()
        .map(|worker| worker.join().unwrap())
        .filter(|receipt| receipt.operator.is_some())
        .count();
    assert_eq!(assigned, 3);
}

#[test]
fn oversized_legacy_weights_still_route() {
    let conn = open_db_in_memory().unwrap();
    let admin = AdminService::new(&conn);
    let web = admin
        .create_source(&NewSource {
            name: "web".to_string(),
        })
        .unwrap();
    for name in ["A", "B", "C"] {
        let operator = admin.create_operator(&NewOperator::named(name)).unwrap();
        conn.execute(
            "INSERT INTO source_operator_weights (source_id, operator_id, weight)
             VALUES (?1, ?2, ?3);",
            rusqlite::params![web.id, operator.id, i64::MAX],
        )
        .unwrap();
    }

    let mut rng = StdRng::seed_from_u64(11);
    let receipt = IntakeService::new(&conn)
        .create_contact(&request("lead-huge", web.id, None), &mut rng)
        .unwrap();
    assert!(matches!(receipt.operator.as_deref(), Some("A" | "B" | "C")));
}

#[test]
fn created_at_is_recorded_in_milliseconds() {
    let conn = open_db_in_memory().unwrap();
    let admin = AdminService::new(&conn);
    let web = admin
        .create_source(&NewSource {
            name: "web".to_string(),
        })
        .unwrap();
    let intake = IntakeService::new(&conn);
    let mut rng = StdRng::seed_from_u64(3);

    let before = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64;
    intake
        .create_contact(&request("lead-early", web.id, None), &mut rng)
        .unwrap();
    thread::sleep(Duration::from_millis(20));
    intake
        .create_contact(&request("lead-late", web.id, None), &mut rng)
        .unwrap();

    let leads = admin.list_leads().unwrap();
    assert_eq!(leads.len(), 2);
    assert!((before - 1_000..before + 60_000).contains(&leads[0].created_at));
    assert!(leads[1].created_at > leads[0].created_at);
    assert!(leads[1].created_at - leads[0].created_at < 1_000);

    let contacts = admin.list_contacts().unwrap();
    assert!(contacts[1].created_at > contacts[0].created_at);
}
