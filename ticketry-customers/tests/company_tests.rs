use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use ticketry_customers::{CompanyMap, CompanyStore, CustomersError};

fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn store() -> CompanyStore {
    CompanyStore::open_in_memory(CompanyMap::default_map()).unwrap()
}

// ── Add / get ─────────────────────────────────────────────────────

#[test]
fn add_and_get_roundtrip() {
    let store = store();
    store
        .add(
            "acme",
            &attrs(&[("name", "Acme Corp"), ("city", "Springfield"), ("url", "https://acme.test")]),
        )
        .unwrap();

    let company = store.get("acme").unwrap().unwrap();
    assert_eq!(company.id, "acme");
    assert_eq!(company.attrs.get("name").unwrap(), "Acme Corp");
    assert_eq!(company.attrs.get("city").unwrap(), "Springfield");
    // Unset attributes are simply absent.
    assert!(!company.attrs.contains_key("street"));
}

#[test]
fn get_missing_company_is_none() {
    let store = store();
    assert!(store.get("nobody").unwrap().is_none());
}

#[test]
fn add_requires_required_attributes() {
    let store = store();
    let err = store.add("acme", &attrs(&[("city", "Springfield")])).unwrap_err();
    match err {
        CustomersError::MissingAttribute { attr } => assert_eq!(attr, "name"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn add_rejects_unmapped_attributes() {
    let store = store();
    let err = store
        .add("acme", &attrs(&[("name", "Acme"), ("fax", "none")]))
        .unwrap_err();
    match err {
        CustomersError::UnknownAttribute { attr } => assert_eq!(attr, "fax"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_id_is_a_database_error() {
    let store = store();
    store.add("acme", &attrs(&[("name", "Acme")])).unwrap();
    let err = store.add("acme", &attrs(&[("name", "Acme Again")])).unwrap_err();
    assert!(matches!(err, CustomersError::Database(_)));
}

// ── Update / rename / delete ──────────────────────────────────────

#[test]
fn update_changes_only_named_attributes() {
    let store = store();
    store
        .add("acme", &attrs(&[("name", "Acme"), ("city", "Springfield")]))
        .unwrap();
    store.update("acme", &attrs(&[("city", "Shelbyville")])).unwrap();

    let company = store.get("acme").unwrap().unwrap();
    assert_eq!(company.attrs.get("name").unwrap(), "Acme");
    assert_eq!(company.attrs.get("city").unwrap(), "Shelbyville");
}

#[test]
fn update_of_missing_company_fails() {
    let store = store();
    let err = store.update("ghost", &attrs(&[("city", "Nowhere")])).unwrap_err();
    assert!(matches!(err, CustomersError::NotFound { .. }));
}

#[test]
fn rename_moves_the_record() {
    let store = store();
    store.add("acme", &attrs(&[("name", "Acme")])).unwrap();
    store.rename("acme", "acme-gmbh").unwrap();

    assert!(store.get("acme").unwrap().is_none());
    let company = store.get("acme-gmbh").unwrap().unwrap();
    assert_eq!(company.attrs.get("name").unwrap(), "Acme");
}

#[test]
fn delete_removes_the_record() {
    let store = store();
    store.add("acme", &attrs(&[("name", "Acme")])).unwrap();
    store.delete("acme").unwrap();
    assert!(store.get("acme").unwrap().is_none());
    assert!(matches!(
        store.delete("acme").unwrap_err(),
        CustomersError::NotFound { .. }
    ));
}

// ── List / search ─────────────────────────────────────────────────

#[test]
fn list_orders_by_display_name() {
    let store = store();
    store.add("z", &attrs(&[("name", "Zeta Ltd")])).unwrap();
    store.add("a", &attrs(&[("name", "Alpha Inc")])).unwrap();

    let listed = store.list().unwrap();
    assert_eq!(
        listed,
        vec![
            ("a".to_string(), "Alpha Inc".to_string()),
            ("z".to_string(), "Zeta Ltd".to_string()),
        ]
    );
}

#[test]
fn search_matches_searchable_columns() {
    let store = store();
    store
        .add("acme", &attrs(&[("name", "Acme Corp"), ("city", "Springfield")]))
        .unwrap();
    store
        .add("globex", &attrs(&[("name", "Globex"), ("city", "Cypress Creek")]))
        .unwrap();

    // "name" is searchable.
    let by_name = store.search("Acme").unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].0, "acme");

    // "city" is searchable.
    let by_city = store.search("Cypress").unwrap();
    assert_eq!(by_city.len(), 1);
    assert_eq!(by_city[0].0, "globex");
}

#[test]
fn search_ignores_unsearchable_columns() {
    let store = store();
    store
        .add("acme", &attrs(&[("name", "Acme"), ("comments", "uses zebra printers")]))
        .unwrap();
    // "comments" is not searchable in the default map.
    assert!(store.search("zebra").unwrap().is_empty());
}

#[test]
fn search_matches_the_key_column() {
    let store = store();
    store.add("acme-intl", &attrs(&[("name", "Acme International")])).unwrap();
    let hits = store.search("acme-intl").unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn search_star_wildcard() {
    let store = store();
    store.add("acme", &attrs(&[("name", "Acme Corp")])).unwrap();
    store.add("acmex", &attrs(&[("name", "Acmex Holdings")])).unwrap();

    let hits = store.search("Acme*").unwrap();
    assert_eq!(hits.len(), 2);
    // Anchored pattern: nothing starts with "Corp".
    assert!(store.search("Corp*").unwrap().is_empty());
}

#[test]
fn blank_search_lists_everything() {
    let store = store();
    store.add("acme", &attrs(&[("name", "Acme")])).unwrap();
    store.add("globex", &attrs(&[("name", "Globex")])).unwrap();
    assert_eq!(store.search("   ").unwrap().len(), 2);
}

// ── Custom maps ───────────────────────────────────────────────────

#[test]
fn custom_map_drives_schema_and_search() {
    let map: CompanyMap = serde_json::from_str(
        r#"{
            "table": "org_units",
            "key_column": "org_id",
            "columns": [
                {"attr": "name", "column": "org_name", "searchable": true, "required": true},
                {"attr": "region", "column": "region", "searchable": true}
            ],
            "name_attr": "name"
        }"#,
    )
    .unwrap();
    let store = CompanyStore::open_in_memory(map).unwrap();

    store
        .add("ops-eu", &attrs(&[("name", "EU Operations"), ("region", "EMEA")]))
        .unwrap();
    let hits = store.search("EMEA").unwrap();
    assert_eq!(hits, vec![("ops-eu".to_string(), "EU Operations".to_string())]);
}
