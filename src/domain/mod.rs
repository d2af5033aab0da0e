// Domain model: the query transformation engine and the catalogue it links through

pub mod catalog;
pub mod query;

pub use catalog::{Catalog, CatalogEntry, CatalogFilter, CatalogPage};
