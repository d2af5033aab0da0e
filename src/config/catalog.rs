use anyhow::{bail, Context, Result};
use std::collections::HashSet;

use crate::{config::yml_entry::YmlEntry, domain::Catalog};

pub const DEFAULT_CATALOG_FILE: &str = "catalog.yml";

/// Read the catalogue from a YAML file (defaults to `catalog.yml`)
pub fn load_catalog(maybe_yml: Option<&str>) -> Result<Catalog> {
    let path = maybe_yml.unwrap_or(DEFAULT_CATALOG_FILE);
    let yml = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read catalog file '{}'", path))?;
    parse_catalog(&yml).with_context(|| format!("Invalid catalog file '{}'", path))
}

pub fn parse_catalog(yml: &str) -> Result<Catalog> {
    let entries: Vec<YmlEntry> = serde_yaml::from_str(yml)?;

    let mut seen = HashSet::new();
    for entry in &entries {
        if entry.title.trim().is_empty() {
            bail!("Catalog entries must have a title");
        }
        if !seen.insert(entry.title.as_str()) {
            bail!("Duplicate title: {}", entry.title);
        }
    }

    Ok(Catalog::new(entries.into_iter().map(Into::into).collect()))
}
