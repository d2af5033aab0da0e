// Template helpers for building links from the current request
//
// Askama templates call these as methods, e.g. `{{ links.replace("page", next) }}`.
// Each call starts from the request being served and returns a `/path?query` URL.

use std::fmt::Display;

use crate::context::{CurrentRequest, RequestContext};
use crate::domain::query::{ParameterSet, QueryTransformer};

#[derive(Debug, Clone)]
pub struct QueryLinks<R: RequestContext = CurrentRequest> {
    request: R,
}

impl<R: RequestContext> QueryLinks<R> {
    pub fn new(request: R) -> Self {
        Self { request }
    }

    fn transformer(&self) -> QueryTransformer<'_, R> {
        QueryTransformer::new(&self.request)
    }

    fn pair(key: &str, value: impl Display) -> ParameterSet {
        std::iter::once((key, value.to_string())).collect()
    }

    /// The current URL, re-serialized
    pub fn current(&self) -> String {
        let qs = self.transformer();
        qs.build(&qs.extract_params(None), None)
    }

    pub fn add(&self, key: &str, value: impl Display) -> String {
        self.transformer().add_params(Self::pair(key, value), None)
    }

    pub fn replace(&self, key: &str, value: impl Display) -> String {
        self.transformer().replace_params(&Self::pair(key, value), None)
    }

    /// Drop `key` only while it holds `value`
    pub fn remove(&self, key: &str, value: impl Display) -> String {
        self.transformer().remove_params(&Self::pair(key, value), None)
    }

    pub fn remove_key(&self, key: &str) -> String {
        self.transformer().remove_keys(key, None)
    }

    pub fn remove_value(&self, value: impl Display) -> String {
        self.transformer().remove_values(value.to_string(), None)
    }

    /// Drop several keys at once, e.g. every filter
    pub fn remove_keys(&self, keys: &[&str]) -> String {
        self.transformer().remove_keys(keys.to_vec(), None)
    }
}
