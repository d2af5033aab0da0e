// Catalogue listing for /catalog
//
// Every navigation link on the page is derived from the request being served,
// so parameters the page does not know about survive filtering and paging.

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::{
    context::{CurrentRequest, RequestContext},
    domain::{
        query::{ParameterSet, ParameterValue, QueryTransformer},
        CatalogEntry, CatalogFilter,
    },
    error::AppError,
    links::QueryLinks,
    AppState,
};

#[derive(Template)]
#[template(path = "catalog.html")]
struct CatalogTemplate<'a> {
    links: QueryLinks,
    search: String,
    tags: Vec<TagDisplay>,
    entries: Vec<&'a CatalogEntry>,
    page: usize,
    total_pages: usize,
    total_matches: usize,
    has_previous: bool,
    has_next: bool,
    previous_page: usize,
    next_page: usize,
    has_filters: bool,
    clear_filters: String,
}

struct TagDisplay {
    name: String,
    active: bool,
}

fn single<'a>(params: &'a ParameterSet, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .and_then(ParameterValue::as_single)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Read the listing filters out of the current query parameters
pub fn filter_from_params(params: &ParameterSet) -> CatalogFilter {
    CatalogFilter {
        tag: single(params, "tag").map(str::to_string),
        search: single(params, "q").map(str::to_string),
        page: single(params, "page")
            .and_then(|page| page.parse().ok())
            .unwrap_or(1),
    }
}

/// Canonical form of the current URL: empty values and `page=1` dropped.
/// `None` when the request is already canonical.
pub fn canonical_url(request: &CurrentRequest) -> Option<String> {
    let qs = QueryTransformer::new(request);
    let current = qs.build(&qs.extract_params(None), None);

    let without_empty = qs.remove_values("", None);
    let first_page: ParameterSet = std::iter::once(("page", "1")).collect();
    let canonical = qs.remove_params(&first_page, Some(without_empty.as_str()));

    (canonical != current).then_some(canonical)
}

// GET /catalog - Filterable, paginated listing
pub async fn catalog_page(
    request: CurrentRequest,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    if let Some(canonical) = canonical_url(&request) {
        tracing::debug!(%canonical, "redirecting to canonical catalogue url");
        return Ok(Redirect::to(&canonical).into_response());
    }

    let filter = filter_from_params(&request.current_query_params());
    let page = state.catalog.page(&filter, state.page_size);

    let tags = state
        .catalog
        .tags()
        .into_iter()
        .map(|name| TagDisplay {
            active: filter.tag.as_deref() == Some(name),
            name: name.to_string(),
        })
        .collect();

    let links = QueryLinks::new(request);
    let clear_filters = links.remove_keys(&["tag", "q", "page"]);

    let tmpl = CatalogTemplate {
        search: filter.search.clone().unwrap_or_default(),
        tags,
        has_previous: page.has_previous(),
        has_next: page.has_next(),
        previous_page: page.page.saturating_sub(1),
        next_page: page.page + 1,
        page: page.page,
        total_pages: page.total_pages,
        total_matches: page.total_matches,
        entries: page.entries,
        has_filters: filter.tag.is_some() || filter.search.is_some(),
        clear_filters,
        links,
    };

    Ok(Html(tmpl.render()?).into_response())
}
