// Ambient request collaborator
//
// Operations called without an explicit URL read the path and query of the
// request currently being served through this trait.

use axum::{extract::FromRequestParts, http::request::Parts, http::Uri};
use std::convert::Infallible;

use crate::domain::query::{ParameterSet, UrlParts};

/// Read-only view of "the URL currently being served"
pub trait RequestContext {
    /// Current path without the leading slash
    fn current_path(&self) -> String;
    /// Decoded query parameters of the current request
    fn current_query_params(&self) -> ParameterSet;
}

// Extractor for the request being served
// Usage: async fn handler(request: CurrentRequest) { ... }
#[derive(Debug, Clone)]
pub struct CurrentRequest {
    path: String,
    query: ParameterSet,
}

impl CurrentRequest {
    pub fn from_uri(uri: &Uri) -> Self {
        Self {
            path: uri.path().trim_start_matches('/').to_string(),
            query: ParameterSet::parse(uri.query().unwrap_or_default()),
        }
    }
}

impl RequestContext for CurrentRequest {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn current_query_params(&self) -> ParameterSet {
        self.query.clone()
    }
}

impl<S> FromRequestParts<S> for CurrentRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentRequest::from_uri(&parts.uri))
    }
}

/// A fixed request, for callers outside of an HTTP handler
#[derive(Debug, Clone, Default)]
pub struct FixedRequest {
    parts: Option<UrlParts>,
}

impl FixedRequest {
    pub fn new(url: &str) -> Self {
        Self {
            parts: Some(UrlParts::parse(url)),
        }
    }
}

impl RequestContext for FixedRequest {
    fn current_path(&self) -> String {
        self.parts
            .as_ref()
            .map(|parts| parts.path.clone())
            .unwrap_or_default()
    }

    fn current_query_params(&self) -> ParameterSet {
        self.parts
            .as_ref()
            .map(|parts| parts.query.clone())
            .unwrap_or_default()
    }
}
