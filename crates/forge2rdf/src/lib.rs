//! Harvest source-forge project metadata into an RDF graph, merge in
//! hand-authored product knowledge, and report over the persisted graph.

pub mod cache;
pub mod cli;
pub mod config;
pub mod deps;
pub mod emitter;
pub mod forge;
pub mod harvest;
pub mod model;
pub mod overlay;
pub mod report;
pub mod store;
