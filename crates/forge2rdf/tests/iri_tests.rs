use forge2rdf::model::iri::IriMinter;
use forge2rdf::model::ProjectDescriptor;

const BASE: &str = "https://api.github.com";

fn minter() -> IriMinter {
    IriMinter::new(BASE)
}

#[test]
fn repository_iri_basic() {
    assert_eq!(
        minter().repository_iri("kubernetes", "kubernetes"),
        "https://api.github.com/repos/kubernetes/kubernetes"
    );
}

#[test]
fn trailing_slash_on_base_is_ignored() {
    let m = IriMinter::new("https://api.github.com/");
    assert_eq!(
        m.repository_iri("coreos", "etcd"),
        "https://api.github.com/repos/coreos/etcd"
    );
}

#[test]
fn project_iri_matches_repository_iri() {
    let p = ProjectDescriptor::new("projectatomic", "rpm-ostree");
    assert_eq!(
        minter().project_iri(&p),
        "https://api.github.com/repos/projectatomic/rpm-ostree"
    );
}

#[test]
fn unsafe_characters_are_escaped() {
    let iri = minter().repository_iri("some owner", "repo#1");
    assert_eq!(iri, "https://api.github.com/repos/some%20owner/repo%231");
}

#[test]
fn slug_round_trips() {
    let m = minter();
    let iri = m.repository_iri("some owner", "rpm-ostree");
    assert_eq!(
        m.repo_slug(&iri),
        Some(ProjectDescriptor::new("some owner", "rpm-ostree"))
    );
}

#[test]
fn slug_of_repository_iri() {
    let slug = minter()
        .repo_slug("https://api.github.com/repos/openshift/origin")
        .expect("slug");
    assert_eq!(slug.owner, "openshift");
    assert_eq!(slug.repo, "origin");
    assert_eq!(slug.to_string(), "openshift/origin");
}

#[test]
fn slug_rejects_other_hosts() {
    assert_eq!(
        minter().repo_slug("https://gitlab.com/repos/openshift/origin"),
        None
    );
    assert_eq!(
        minter().repo_slug("https://access.redhat.com/products/red-hat-enterprise-linux/"),
        None
    );
}

#[test]
fn slug_rejects_wrong_shape() {
    let m = minter();
    assert_eq!(m.repo_slug("https://api.github.com/repos/openshift"), None);
    assert_eq!(m.repo_slug("https://api.github.com/repos/openshift/"), None);
    assert_eq!(
        m.repo_slug("https://api.github.com/repos/openshift/origin/contents"),
        None
    );
    assert_eq!(m.repo_slug("https://api.github.com/users/openshift/origin"), None);
}
