//! Hand-authored facts merged into the graph on every harvest run.
//!
//! These cannot be derived from the forge API (who makes a product, which
//! projects a product is built from), so they are re-asserted each run
//! rather than trusted to survive in the snapshot.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::ontology::{so, standard, xkos};
use crate::model::Triple;
use crate::store::TripleStore;

pub const RED_HAT: &str = "https://www.redhat.com/";
const RED_HAT_LEGAL_NAME: &str = "Red Hat, Inc.";
const RED_HAT_LOGO: &str = "https://www.redhat.com/profiles/rh/themes/redhatdotcom/img/logo.png";

pub const OPENSHIFT_ENTERPRISE: &str =
    "https://access.redhat.com/products/openshift-enterprise-red-hat/";
pub const RHEL: &str = "https://access.redhat.com/products/red-hat-enterprise-linux/";

/// Static `xkos:hasPart` edges: (container, contained).
const COMPOSITION: &[(&str, &str)] = &[
    (OPENSHIFT_ENTERPRISE, "https://api.github.com/repos/openshift/origin"),
    (OPENSHIFT_ENTERPRISE, RHEL),
    (RHEL, "https://api.github.com/repos/projectatomic/docker"),
];

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("cannot read product seed file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed product seed file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One entry of the product seed file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductSeed {
    pub uri: String,
    pub name: String,
    pub category: String,
}

impl ProductSeed {
    /// Products are software applications manufactured by Red Hat.
    pub fn statements(&self) -> Vec<Triple> {
        let s = self.uri.as_str();
        vec![
            Triple::iri(s, standard::RDF_TYPE, so::PRODUCT),
            Triple::iri(s, standard::RDF_TYPE, so::SOFTWARE_APPLICATION),
            Triple::literal(s, so::NAME, &self.name),
            Triple::iri(s, so::MANUFACTURER, RED_HAT),
            Triple::literal(s, so::APPLICATION_CATEGORY, &self.category),
        ]
    }
}

pub fn load_product_seeds(path: &Path) -> Result<Vec<ProductSeed>, OverlayError> {
    let text = std::fs::read_to_string(path).map_err(|source| OverlayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| OverlayError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// The full overlay: organization facts, composition edges and products.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeOverlay {
    products: Vec<ProductSeed>,
}

impl KnowledgeOverlay {
    /// Only the built-in organization and composition facts.
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn with_products(mut self, products: Vec<ProductSeed>) -> Self {
        self.products = products;
        self
    }

    pub fn products(&self) -> &[ProductSeed] {
        &self.products
    }

    pub fn statements(&self) -> Vec<Triple> {
        let mut triples = vec![
            Triple::iri(RED_HAT, standard::RDF_TYPE, so::ORGANIZATION),
            Triple::literal(RED_HAT, so::LEGAL_NAME, RED_HAT_LEGAL_NAME),
            Triple::literal(RED_HAT, so::LOGO, RED_HAT_LOGO),
        ];
        for product in &self.products {
            debug!(product = %product.name, "adding product");
            triples.extend(product.statements());
        }
        triples.extend(
            COMPOSITION
                .iter()
                .map(|(container, part)| Triple::iri(container, xkos::HAS_PART, part)),
        );
        triples
    }

    /// Insert the overlay, returning how many statements were new.
    pub fn apply(&self, store: &mut TripleStore) -> usize {
        let inserted = store.extend(self.statements());
        info!(inserted, products = self.products.len(), "applied knowledge overlay");
        inserted
    }
}
