use forminator_sql::prelude::*;
use pretty_assertions::assert_eq;

fn submission(entry_id: u64, meta_id_start: u64) -> FormSubmission {
    FormSubmission {
        entry_id,
        meta_id_start,
        first_name: "Zoé".to_string(),
        last_name: "O'Connor".to_string(),
        email: "zoe@example.com".to_string(),
        phone: "+33 6 12 34 56 78".to_string(),
        grade: "Daishihan".to_string(),
        dojo_name: "Dojo de Genève".to_string(),
        birth_date: "15/06/1980".to_string(),
        gender: "F".to_string(),
        stripe_transaction_id: "pi_1A2B3C4D5E6F7G8H9I0J1K2L".to_string(),
        stripe_amount: "375.00".to_string(),
        currency: "EUR".to_string(),
        party: true,
        t_shirt: true,
        t_shirt_size: Some("S".to_string()),
        ffst_id: None,
        date_created: Some("2025-06-15 10:00:00".to_string()),
    }
}

#[test]
fn test_full_entry_statements() {
    let statements = generate_entry_inserts(&submission(338, 3000)).unwrap();
    assert_eq!(statements.len(), 16);

    let prefix = "INSERT INTO wp_frmt_form_entry_meta (meta_id, entry_id, meta_key, meta_value, date_created, date_updated) VALUES ";
    assert!(statements.iter().all(|s| s.starts_with(prefix)));
    assert!(statements.iter().all(|s| s.ends_with(", '2025-06-15 10:00:00', '0000-00-00 00:00:00');")));

    assert_eq!(
        statements[0],
        format!("{prefix}(3000, 338, 'hidden-1', '338', '2025-06-15 10:00:00', '0000-00-00 00:00:00');")
    );
    assert_eq!(
        statements[4],
        format!(
            "{prefix}(3004, 338, 'name-1', 'a:2:{{s:10:\"first-name\";s:4:\"Zoé\";s:9:\"last-name\";s:8:\"O\\'Connor\";}}', '2025-06-15 10:00:00', '0000-00-00 00:00:00');"
        )
    );
    assert_eq!(
        statements[15],
        format!(
            "{prefix}(3015, 338, 'stripe-ocs-1', 'a:4:{{s:14:\"transaction_id\";s:27:\"pi_1A2B3C4D5E6F7G8H9I0J1K2L\";s:6:\"amount\";s:6:\"375.00\";s:8:\"currency\";s:3:\"EUR\";s:6:\"status\";s:9:\"completed\";}}', '2025-06-15 10:00:00', '0000-00-00 00:00:00');"
        )
    );
}

#[test]
fn test_rows_round_trip_through_reader() {
    let composer = Composer::default();
    let rows = composer.compose(&submission(338, 3000)).unwrap();
    let name = rows.iter().find(|r| r.meta_key == "name-1").unwrap();
    assert_eq!(
        parse_array(&name.meta_value).unwrap(),
        vec![
            ("first-name".to_string(), "Zoé".to_string()),
            ("last-name".to_string(), "O'Connor".to_string()),
        ]
    );
}

#[test]
fn test_batch_matches_individual_generation() {
    let a = submission(338, 3000);
    let mut b = submission(339, 5000);
    b.party = false;
    b.t_shirt = false;

    let batch = generate_multiple_entries(&[a.clone(), b.clone()]).unwrap();
    let mut separate = generate_entry_inserts(&a).unwrap();
    separate.extend(generate_entry_inserts(&b).unwrap());

    assert_eq!(batch.len(), 16 + 12);
    assert_eq!(batch, separate);
    assert!(batch[16].contains("(5000, 339, 'hidden-1'"));
}

#[test]
fn test_failed_entry_produces_nothing() {
    let mut bad = submission(340, 6000);
    bad.stripe_amount.clear();

    let err = generate_multiple_entries(&[submission(338, 3000), bad.clone()]).unwrap_err();
    assert_eq!(err.to_string(), "entry 340: missing required field 'stripe_amount'");

    let results = generate_each(&[bad, submission(341, 7000)]);
    assert!(results[0].is_err());
    assert_eq!(results[1].as_ref().map(Vec::len).ok(), Some(16));
}

#[test]
fn test_script_from_json_input() {
    let json = r#"[{
        "entry_id": 668,
        "meta_id_start": 6031,
        "first_name": "Xander",
        "last_name": "Beemer",
        "email": "xander@example.com",
        "phone": "+31 6 12345678",
        "grade": "6 Dan",
        "dojo_name": "Miko Dojo",
        "birth_date": "02/03/1973",
        "gender": "M",
        "stripe_transaction_id": "pi_3RnbxeBvS0tjVNMi1g2TFBHk",
        "stripe_amount": "350.00",
        "t_shirt": true,
        "date_created": "2025-07-21 14:05:09"
    }]"#;
    let submissions = parse_submissions(json).unwrap();
    let composer = Composer::new(Settings::builder().table("wp2_frmt_form_entry_meta").build());

    let at = chrono::NaiveDate::from_ymd_opt(2025, 7, 22)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap();
    let mut script = SqlScript::new(at);
    for s in &submissions {
        script.push_entry(s.entry_id, composer.entry_inserts(s).unwrap());
    }

    let text = script.to_string();
    assert_eq!(script.statement_count(), 15);
    assert!(text.contains("-- Entry ID: 668\nINSERT INTO wp2_frmt_form_entry_meta "));
    assert!(text.contains("'checkbox-2', 'T-Shirt'"));
    assert!(text.ends_with("-- Total queries generated: 15\n"));
}
