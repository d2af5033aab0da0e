// Catalogue entries and the filters the listing page applies to them

use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Filters read from the listing page's query string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub tag: Option<String>,
    pub search: Option<String>,
    pub page: usize,
}

/// One page of filtered entries
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage<'a> {
    pub entries: Vec<&'a CatalogEntry>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

impl CatalogPage<'_> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every tag in use, sorted
    pub fn tags(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|entry| entry.tags.iter().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Apply the filter and cut out the requested page (1-based, clamped to range)
    pub fn page(&self, filter: &CatalogFilter, page_size: usize) -> CatalogPage<'_> {
        let search = filter.search.as_deref().map(str::to_lowercase);

        let matches: Vec<&CatalogEntry> = self
            .entries
            .iter()
            .filter(|entry| {
                filter
                    .tag
                    .as_deref()
                    .map_or(true, |tag| entry.tags.iter().any(|t| t == tag))
            })
            .filter(|entry| {
                search
                    .as_deref()
                    .map_or(true, |needle| entry.title.to_lowercase().contains(needle))
            })
            .collect();

        let page_size = page_size.max(1);
        let total_matches = matches.len();
        let total_pages = total_matches.div_ceil(page_size).max(1);
        let page = filter.page.clamp(1, total_pages);

        CatalogPage {
            entries: matches
                .into_iter()
                .skip((page - 1) * page_size)
                .take(page_size)
                .collect(),
            page,
            total_pages,
            total_matches,
        }
    }
}
