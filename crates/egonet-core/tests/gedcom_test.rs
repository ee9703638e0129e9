use egonet_core::{Error, RecordSet, parse_gedcom, parse_gedcom_bytes, resolve_surroundings};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(name: &str) -> PathBuf {
    workspace_root().join("fixtures").join("gedcom").join(name)
}

fn load(name: &str) -> RecordSet {
    let text = std::fs::read_to_string(fixture(name)).expect("fixture");
    parse_gedcom(&text).expect("parse ok")
}

fn ids(list: &[egonet_core::PersonSummary]) -> Vec<&str> {
    list.iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn doe_family_parses_individuals_and_families_in_file_order() {
    let records = load("doe_family.ged");

    let people: Vec<&str> = records.individuals.keys().map(String::as_str).collect();
    assert_eq!(
        people,
        vec![
            "@I1@", "@I2@", "@I3@", "@I4@", "@I5@", "@I6@", "@I7@", "@I8@", "@I9@", "@I10@"
        ]
    );
    assert_eq!(records.families.len(), 3);

    let john = &records.individuals["@I1@"];
    assert_eq!(john.name, "John Doe");
    assert_eq!(john.birth_date.as_deref(), Some("12 MAR 1920"));
    assert_eq!(john.death_date.as_deref(), Some("4 JUL 1990"));
    assert_eq!(john.spouse_families, vec!["@F1@"]);

    let jack = &records.individuals["@I3@"];
    assert_eq!(jack.parent_families, vec!["@F1@"]);
    assert_eq!(jack.spouse_families, vec!["@F2@", "@F3@"]);
    assert_eq!(jack.death_date, None);

    let unnamed = &records.individuals["@I10@"];
    assert_eq!(unnamed.name, "");

    let f2 = &records.families["@F2@"];
    assert_eq!(f2.husband.as_deref(), Some("@I3@"));
    assert_eq!(f2.wife.as_deref(), Some("@I4@"));
    assert_eq!(f2.children, vec!["@I7@", "@I8@"]);
}

#[test]
fn surroundings_of_jack_cover_all_four_lists() {
    let records = load("doe_family.ged");
    let s = resolve_surroundings("@I3@", &records).expect("surroundings");

    assert_eq!(ids(&s.parents), vec!["@I1@", "@I2@"]);
    assert_eq!(ids(&s.siblings), vec!["@I5@", "@I6@"]);
    assert_eq!(ids(&s.spouses), vec!["@I4@", "@I9@"]);
    assert_eq!(ids(&s.children), vec!["@I7@", "@I8@", "@I10@"]);
}

#[test]
fn surroundings_of_a_root_person_have_no_parents() {
    let records = load("doe_family.ged");
    let s = resolve_surroundings("@I1@", &records).expect("surroundings");

    assert!(s.parents.is_empty());
    assert!(s.siblings.is_empty());
    assert_eq!(ids(&s.spouses), vec!["@I2@"]);
    assert_eq!(ids(&s.children), vec!["@I5@", "@I3@", "@I6@"]);
}

#[test]
fn crlf_files_parse() {
    let records = load("single_person.ged");
    assert_eq!(records.individuals.len(), 1);
    assert_eq!(records.individuals["@I1@"].name, "Solo Person");
    let s = resolve_surroundings("@I1@", &records).expect("surroundings");
    assert_eq!(s.displayed_len(), 0);
}

#[test]
fn malformed_levels_report_the_line() {
    let bytes = std::fs::read(fixture("malformed_level.ged")).expect("fixture");
    let err = parse_gedcom_bytes(&bytes).unwrap_err();
    assert!(matches!(err, Error::Gedcom { line: 3, .. }), "{err:?}");
}

#[test]
fn record_sets_round_trip_through_json() {
    let records = load("doe_family.ged");
    let json = serde_json::to_string(&records).expect("serialize");
    assert!(json.starts_with(r#"{"individuals":{"@I1@":"#));
    let back: RecordSet = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, records);
}
