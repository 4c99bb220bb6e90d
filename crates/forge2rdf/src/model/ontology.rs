//! RDF vocabulary constants used to describe projects, products and organizations.
//!
//! - `doap:` (http://usefulinc.com/ns/doap#) -- project metadata
//! - `xkos:` (http://rdf-vocabulary.ddialliance.org/xkos#) -- composition (`hasPart`)
//! - `so:` (http://schema.org/version/3.1/) -- organizations and products
//! - `forge:` (http://forge2rdf.example/ontology/) -- facts derived by this tool

/// Standard RDF/XSD namespace URIs
pub mod standard {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}

/// Description of a Project
pub mod doap {
    pub const PREFIX: &str = "doap";
    pub const NS: &str = "http://usefulinc.com/ns/doap#";

    pub const PROJECT: &str = "http://usefulinc.com/ns/doap#Project";

    pub const NAME: &str = "http://usefulinc.com/ns/doap#name";
    pub const PROGRAMMING_LANGUAGE: &str = "http://usefulinc.com/ns/doap#programming-language";
    pub const HOMEPAGE: &str = "http://usefulinc.com/ns/doap#homepage";
    pub const DESCRIPTION: &str = "http://usefulinc.com/ns/doap#description";
}

/// Extended Knowledge Organization System; only the composition relation is used.
pub mod xkos {
    pub const PREFIX: &str = "xkos";
    pub const NS: &str = "http://rdf-vocabulary.ddialliance.org/xkos#";

    pub const HAS_PART: &str = "http://rdf-vocabulary.ddialliance.org/xkos#hasPart";
}

pub mod skos {
    pub const PREFIX: &str = "skos";
    pub const NS: &str = "http://www.w3.org/2004/02/skos/core#";
}

pub mod gr {
    pub const PREFIX: &str = "gr";
    pub const NS: &str = "http://purl.org/goodrelations/v1#";
}

/// schema.org, pinned to the 3.1 release namespace.
pub mod so {
    pub const PREFIX: &str = "so";
    pub const NS: &str = "http://schema.org/version/3.1/";

    // Classes
    pub const ORGANIZATION: &str = "http://schema.org/version/3.1/Organization";
    pub const PRODUCT: &str = "http://schema.org/version/3.1/Product";
    pub const SOFTWARE_APPLICATION: &str = "http://schema.org/version/3.1/SoftwareApplication";

    // Properties
    pub const NAME: &str = "http://schema.org/version/3.1/name";
    pub const LEGAL_NAME: &str = "http://schema.org/version/3.1/legalName";
    pub const LOGO: &str = "http://schema.org/version/3.1/logo";
    pub const MANUFACTURER: &str = "http://schema.org/version/3.1/manufacturer";
    pub const APPLICATION_CATEGORY: &str = "http://schema.org/version/3.1/applicationCategory";
}

/// Facts derived by the dependency enrichment pass.
pub mod forge {
    pub const PREFIX: &str = "forge";
    pub const NS: &str = "http://forge2rdf.example/ontology/";

    pub const DEPENDENCY_MANIFEST: &str = "http://forge2rdf.example/ontology/dependencyManifest";
    /// `owner/repo` as configured, when the forge answered under another URL.
    pub const REQUESTED_AS: &str = "http://forge2rdf.example/ontology/requestedAs";
}

/// Every (prefix, namespace) pair known to the tools, in registration order.
pub const PREFIXES: &[(&str, &str)] = &[
    ("rdf", standard::RDF),
    ("xsd", standard::XSD),
    (doap::PREFIX, doap::NS),
    (xkos::PREFIX, xkos::NS),
    (skos::PREFIX, skos::NS),
    (gr::PREFIX, gr::NS),
    (so::PREFIX, so::NS),
    (forge::PREFIX, forge::NS),
];

/// Look up the namespace registered for `prefix`.
pub fn namespace(prefix: &str) -> Option<&'static str> {
    PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, ns)| *ns)
}
