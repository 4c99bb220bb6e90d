pub mod iri;
pub mod ontology;
pub mod project;
pub mod term;

pub use project::ProjectDescriptor;
pub use term::{Term, Triple};
