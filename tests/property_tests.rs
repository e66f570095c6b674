/// Property-based tests using proptest
/// Tests invariants and properties that should hold for all inputs
use maps_leads::export::{columns_from_first, to_records, write_csv, Record};
use maps_leads::models::{CoordinateToken, LeadPayload, PersonRecord};
use proptest::prelude::*;
use serde_json::{json, Value};

// Property: coordinate tokens always have the provider's `@lat,lon,zoomz` shape
proptest! {
    #[test]
    fn coordinate_token_shape(
        lat in -90.0f64..90.0,
        lon in -180.0f64..180.0,
        zoom in 1u8..=21u8
    ) {
        let token = CoordinateToken::new(lat.to_string(), lon.to_string(), zoom);
        let s = token.as_str();
        prop_assert!(s.starts_with('@'));
        let suffix = format!(",{}z", zoom);
        prop_assert!(s.ends_with(&suffix));
        prop_assert_eq!(s.matches(',').count(), 2);
    }
}

// Property: person extraction never panics and yields one person per result entry
proptest! {
    #[test]
    fn people_count_matches_results(
        names in proptest::collection::vec(proptest::option::of("\\PC{0,20}"), 0..8)
    ) {
        let results: Vec<Value> = names
            .iter()
            .map(|name| json!({"full_name": name, "seniority": 3}))
            .collect();
        let payload = LeadPayload(json!({"results": results}));

        let people = payload.people();
        prop_assert_eq!(people.len(), names.len());
        for (person, name) in people.iter().zip(&names) {
            prop_assert_eq!(person.name.as_ref(), name.as_ref());
            prop_assert_eq!(person.seniority.as_deref(), Some("3"));
        }
    }

    #[test]
    fn person_from_arbitrary_json_never_panics(raw in "\\PC*") {
        let value = serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw));
        let _ = PersonRecord::from_lead(&value);
        let _ = LeadPayload(value).people();
    }
}

// Property: CSV export writes one header plus one line per record
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn csv_has_header_plus_one_line_per_record(
        rows in proptest::collection::vec(("[a-zA-Z ]{0,12}", any::<i32>()), 1..20)
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");

        let records: Vec<Record> = to_records(
            &rows
                .iter()
                .map(|(label, n)| json!({"label": label, "n": n}))
                .collect::<Vec<_>>(),
        )
        .unwrap();
        write_csv(&records, &columns_from_first(&records), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        prop_assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["label", "n"]);

        let parsed: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        prop_assert_eq!(parsed.len(), rows.len());
        for (record, (label, n)) in parsed.iter().zip(&rows) {
            prop_assert_eq!(&record[0], label.as_str());
            let expected = n.to_string();
            prop_assert_eq!(&record[1], expected.as_str());
        }
    }
}
