use forge2rdf::model::ontology::{doap, so, standard, xkos};
use forge2rdf::model::{Term, Triple};
use forge2rdf::store::query::{GroupPattern, PatternTerm, Query};
use forge2rdf::store::TripleStore;

const PRODUCT: &str = "https://access.redhat.com/products/openshift-enterprise-red-hat/";
const BARE_PRODUCT: &str = "https://access.redhat.com/products/red-hat-enterprise-linux/";
const ORIGIN: &str = "https://api.github.com/repos/openshift/origin";
const K8S: &str = "https://api.github.com/repos/kubernetes/kubernetes";
const ETCD: &str = "https://api.github.com/repos/coreos/etcd";

fn product(store: &mut TripleStore, iri: &str, name: &str) {
    store.insert(Triple::iri(iri, standard::RDF_TYPE, so::SOFTWARE_APPLICATION));
    store.insert(Triple::literal(iri, so::NAME, name));
}

fn project(store: &mut TripleStore, iri: &str, name: &str) {
    store.insert(Triple::iri(iri, standard::RDF_TYPE, doap::PROJECT));
    store.insert(Triple::literal(iri, doap::NAME, name));
    store.insert(Triple::literal(iri, doap::DESCRIPTION, &format!("{name} description")));
}

const PRODUCT_PROJECTS: &str = r#"
SELECT *
WHERE {
  ?product a so:SoftwareApplication .
  ?product so:name ?productName .
  OPTIONAL {
    ?product xkos:hasPart ?project .
    ?project a doap:Project .
    ?project doap:name ?projectName .
  }
}
"#;

#[test]
fn optional_keeps_product_without_projects() {
    let mut store = TripleStore::new();
    product(&mut store, BARE_PRODUCT, "RHEL");

    let rows = store.query(&Query::parse(PRODUCT_PROJECTS).unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value("productName"), Some("RHEL"));
    assert!(!rows[0].is_bound("project"));
    assert_eq!(rows[0].get("projectName"), None);
}

#[test]
fn optional_yields_one_row_per_linked_project() {
    let mut store = TripleStore::new();
    product(&mut store, PRODUCT, "OpenShift");
    project(&mut store, ORIGIN, "origin");
    project(&mut store, K8S, "kubernetes");
    store.insert(Triple::iri(PRODUCT, xkos::HAS_PART, ORIGIN));
    store.insert(Triple::iri(PRODUCT, xkos::HAS_PART, K8S));

    let rows = store.query(&Query::parse(PRODUCT_PROJECTS).unwrap());
    assert_eq!(rows.len(), 2);
    let names: Vec<&str> = rows.iter().filter_map(|r| r.value("projectName")).collect();
    assert_eq!(names, vec!["origin", "kubernetes"]);
    assert!(rows.iter().all(|r| r.value("productName") == Some("OpenShift")));
}

#[test]
fn optional_group_is_all_or_nothing() {
    // The part exists but is not a doap:Project, so the whole group fails
    // and none of its variables are bound.
    let mut store = TripleStore::new();
    product(&mut store, PRODUCT, "OpenShift");
    product(&mut store, BARE_PRODUCT, "RHEL");
    store.insert(Triple::iri(PRODUCT, xkos::HAS_PART, BARE_PRODUCT));

    let rows = store.query(&Query::parse(PRODUCT_PROJECTS).unwrap());
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| !r.is_bound("project")));
}

#[test]
fn nested_optional_binds_technology_when_present() {
    let mut store = TripleStore::new();
    product(&mut store, PRODUCT, "OpenShift");
    project(&mut store, ORIGIN, "origin");
    project(&mut store, K8S, "kubernetes");
    project(&mut store, ETCD, "etcd");
    store.insert(Triple::iri(PRODUCT, xkos::HAS_PART, ORIGIN));
    store.insert(Triple::iri(PRODUCT, xkos::HAS_PART, ETCD));
    store.insert(Triple::iri(ORIGIN, xkos::HAS_PART, K8S));

    let q = Query::parse(
        r#"SELECT * {
             ?product so:name ?productName .
             OPTIONAL {
               ?product xkos:hasPart ?project .
               ?project doap:name ?projectName .
               OPTIONAL { ?project xkos:hasPart ?technology . ?technology doap:name ?technologyName }
             }
           }"#,
    )
    .unwrap();
    let rows = store.query(&q);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].value("projectName"), Some("origin"));
    assert_eq!(rows[0].value("technologyName"), Some("kubernetes"));
    assert_eq!(rows[1].value("projectName"), Some("etcd"));
    assert!(!rows[1].is_bound("technology"));
}

#[test]
fn join_on_shared_variable() {
    let mut store = TripleStore::new();
    project(&mut store, ORIGIN, "origin");
    project(&mut store, K8S, "kubernetes");
    store.insert(Triple::literal(K8S, doap::PROGRAMMING_LANGUAGE, "Go"));

    let q = Query::parse("SELECT ?name { ?p doap:programming-language \"Go\" . ?p doap:name ?name }")
        .unwrap();
    let rows = store.query(&q);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value("name"), Some("kubernetes"));
    assert_eq!(rows[0].len(), 1, "projection drops ?p");
}

#[test]
fn repeated_variable_must_bind_consistently() {
    let mut store = TripleStore::new();
    store.insert(Triple::iri(K8S, xkos::HAS_PART, K8S));
    store.insert(Triple::iri(ORIGIN, xkos::HAS_PART, K8S));

    let q = Query::parse("SELECT * { ?x xkos:hasPart ?x }").unwrap();
    let rows = store.query(&q);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("x"), Some(&Term::iri(K8S)));
}

#[test]
fn literal_binding_never_matches_subject() {
    let mut store = TripleStore::new();
    project(&mut store, K8S, "kubernetes");
    let q = Query::parse("SELECT * { ?p doap:name ?n . ?n doap:name ?m }").unwrap();
    assert!(store.query(&q).is_empty());
}

#[test]
fn order_by_puts_unbound_first() {
    let mut store = TripleStore::new();
    product(&mut store, PRODUCT, "OpenShift");
    project(&mut store, ORIGIN, "origin");
    store.insert(Triple::iri(PRODUCT, xkos::HAS_PART, ORIGIN));
    product(&mut store, BARE_PRODUCT, "RHEL");

    let q = Query::parse(&format!("{PRODUCT_PROJECTS} ORDER BY ?project")).unwrap();
    let rows = store.query(&q);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].value("productName"), Some("RHEL"));
    assert_eq!(rows[1].value("projectName"), Some("origin"));
}

#[test]
fn built_query_matches_parsed_query() {
    let mut store = TripleStore::new();
    project(&mut store, K8S, "kubernetes");
    store.insert(Triple::literal(K8S, doap::PROGRAMMING_LANGUAGE, "Go"));

    let built = Query::select_all(GroupPattern::new().triple(
        PatternTerm::var("project"),
        PatternTerm::iri(doap::PROGRAMMING_LANGUAGE),
        PatternTerm::literal("Go"),
    ));
    let parsed = Query::parse("SELECT * { ?project doap:programming-language \"Go\" }").unwrap();
    assert_eq!(built, parsed);
    assert_eq!(store.query(&built), store.query(&parsed));
}

#[test]
fn empty_store_yields_no_rows() {
    let store = TripleStore::new();
    assert!(store.query(&Query::parse(PRODUCT_PROJECTS).unwrap()).is_empty());
}
