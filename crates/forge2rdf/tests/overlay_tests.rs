use std::fs;
use std::path::Path;

use forge2rdf::model::ontology::{so, standard, xkos};
use forge2rdf::model::{Term, Triple};
use forge2rdf::overlay::{
    load_product_seeds, KnowledgeOverlay, OverlayError, ProductSeed, OPENSHIFT_ENTERPRISE, RED_HAT,
    RHEL,
};
use forge2rdf::store::TripleStore;

fn fixture_seeds() -> Vec<ProductSeed> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/redhat_products.json");
    load_product_seeds(&path).expect("fixture seeds should parse")
}

#[test]
fn standard_overlay_has_organization_and_composition() {
    let mut store = TripleStore::new();
    let inserted = KnowledgeOverlay::standard().apply(&mut store);
    assert_eq!(inserted, 6);
    assert!(store.contains(&Triple::iri(RED_HAT, standard::RDF_TYPE, so::ORGANIZATION)));
    assert!(store.contains(&Triple::literal(RED_HAT, so::LEGAL_NAME, "Red Hat, Inc.")));
    assert!(store.contains(&Triple::iri(OPENSHIFT_ENTERPRISE, xkos::HAS_PART, RHEL)));
    assert!(store.contains(&Triple::iri(
        OPENSHIFT_ENTERPRISE,
        xkos::HAS_PART,
        "https://api.github.com/repos/openshift/origin"
    )));
}

#[test]
fn reapplying_is_a_no_op() {
    let overlay = KnowledgeOverlay::standard().with_products(fixture_seeds());
    let mut store = TripleStore::new();
    let first = overlay.apply(&mut store);
    let len = store.len();
    assert_eq!(overlay.apply(&mut store), 0);
    assert_eq!(store.len(), len);
    assert_eq!(first, len);
}

#[test]
fn products_become_software_applications() {
    let overlay = KnowledgeOverlay::standard().with_products(fixture_seeds());
    assert_eq!(overlay.products().len(), 2);
    let mut store = TripleStore::new();
    overlay.apply(&mut store);

    let apps = Term::iri(so::SOFTWARE_APPLICATION);
    let products: Vec<&str> = store.subjects(standard::RDF_TYPE, &apps).collect();
    assert_eq!(products, vec![OPENSHIFT_ENTERPRISE, RHEL]);
    assert!(store.contains(&Triple::iri(RHEL, so::MANUFACTURER, RED_HAT)));
    assert!(store.contains(&Triple::iri(RHEL, standard::RDF_TYPE, so::PRODUCT)));
    assert!(store.contains(&Triple::literal(RHEL, so::APPLICATION_CATEGORY, "Platforms")));
    assert!(store.contains(&Triple::literal(
        OPENSHIFT_ENTERPRISE,
        so::NAME,
        "OpenShift Enterprise"
    )));
}

#[test]
fn overlay_merges_into_existing_graph() {
    let mut store = TripleStore::new();
    store.insert(Triple::literal(RED_HAT, so::LEGAL_NAME, "Red Hat, Inc."));
    let inserted = KnowledgeOverlay::standard().apply(&mut store);
    assert_eq!(inserted, 5);
}

#[test]
fn malformed_seed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    fs::write(&path, r#"[{"uri": "https://example.org/p", "name": "P"}]"#).unwrap();
    assert!(matches!(
        load_product_seeds(&path),
        Err(OverlayError::Json { .. })
    ));
}

#[test]
fn missing_seed_file_is_an_error() {
    assert!(matches!(
        load_product_seeds(Path::new("/nonexistent/products.json")),
        Err(OverlayError::Io { .. })
    ));
}
