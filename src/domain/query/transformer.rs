// Query-string transformation engine

use tracing::debug;

use super::args::{Additions, OneOrMany};
use super::params::{loosely_eq_str, ParameterSet, UrlParts};
use crate::context::RequestContext;

/// Applies one transformation to a URL's query parameters and rebuilds the URL.
///
/// Every operation takes an optional URL. Without one, the path and parameters
/// of the ambient request are the baseline. Results always start with `/`.
pub struct QueryTransformer<'a, R: RequestContext + ?Sized> {
    request: &'a R,
}

impl<'a, R: RequestContext + ?Sized> QueryTransformer<'a, R> {
    pub fn new(request: &'a R) -> Self {
        Self { request }
    }

    /// Current parameters of `url`, or of the ambient request when `url` is `None`
    pub fn extract_params(&self, url: Option<&str>) -> ParameterSet {
        match url {
            Some(url) => UrlParts::query_of(url),
            None => self.request.current_query_params(),
        }
    }

    /// Shallow-merge each addition in order. Later additions win on collision.
    pub fn add_params(&self, additions: impl Into<Additions>, url: Option<&str>) -> String {
        let mut merged = self.extract_params(url);

        for addition in additions.into().into_vec() {
            merged.merge(addition);
        }

        debug!(operation = "add_params", ?url, keys = merged.len(), "transformed query");
        self.build(&merged, url)
    }

    /// Remove entries whose key is in `pairs` with a loosely equal value
    pub fn remove_params(&self, pairs: &ParameterSet, url: Option<&str>) -> String {
        let remaining = self.extract_params(url).filtered(|key, value| {
            !pairs
                .get(key)
                .is_some_and(|unwanted| unwanted.loosely_eq(value))
        });

        debug!(operation = "remove_params", ?url, keys = remaining.len(), "transformed query");
        self.build(&remaining, url)
    }

    /// Remove every listed key, whatever its value
    pub fn remove_keys(&self, keys: impl Into<OneOrMany<String>>, url: Option<&str>) -> String {
        let keys = keys.into().into_vec();
        let remaining = self
            .extract_params(url)
            .filtered(|key, _| !keys.iter().any(|unwanted| unwanted == key));

        debug!(operation = "remove_keys", ?url, keys = remaining.len(), "transformed query");
        self.build(&remaining, url)
    }

    /// Remove every key whose value loosely equals one of `values`
    pub fn remove_values(&self, values: impl Into<OneOrMany<String>>, url: Option<&str>) -> String {
        let values = values.into().into_vec();
        let remaining = self.extract_params(url).filtered(|_, value| {
            !value
                .as_single()
                .is_some_and(|current| values.iter().any(|unwanted| loosely_eq_str(current, unwanted)))
        });

        debug!(operation = "remove_values", ?url, keys = remaining.len(), "transformed query");
        self.build(&remaining, url)
    }

    /// Overwrite or insert each key of `params`. Existing keys keep their position.
    pub fn replace_params(&self, params: &ParameterSet, url: Option<&str>) -> String {
        let mut merged = self.extract_params(url);

        for (key, value) in params.iter() {
            merged.insert(key.clone(), value.clone());
        }

        debug!(operation = "replace_params", ?url, keys = merged.len(), "transformed query");
        self.build(&merged, url)
    }

    /// `/` + path + `?` + encoded params. An empty set still ends in `?`.
    pub fn build(&self, params: &ParameterSet, url: Option<&str>) -> String {
        let path = match url {
            Some(url) => UrlParts::path_of(url),
            None => self.request.current_path(),
        };

        format!("/{}?{}", path.trim_start_matches('/'), params.to_query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FixedRequest;
    use crate::domain::query::ParameterValue;

    fn set(pairs: &[(&str, &str)]) -> ParameterSet {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn with_url<T>(f: impl FnOnce(QueryTransformer<'_, FixedRequest>) -> T) -> T {
        let request = FixedRequest::default();
        f(QueryTransformer::new(&request))
    }

    #[test]
    fn test_add_params_overwrites() {
        let url = with_url(|qs| qs.add_params(set(&[("a", "1")]), Some("/x?a=0")));
        assert_eq!(url, "/x?a=1");
    }

    #[test]
    fn test_add_params_appends_new_keys() {
        let url = with_url(|qs| qs.add_params(set(&[("c", "3")]), Some("/x?a=1&b=2")));
        assert_eq!(url, "/x?a=1&b=2&c=3");
    }

    #[test]
    fn test_add_params_list_later_entries_win() {
        let additions = vec![set(&[("a", "1"), ("b", "1")]), set(&[("a", "2")])];
        let url = with_url(|qs| qs.add_params(additions, Some("/x")));
        assert_eq!(url, "/x?a=2&b=1");
    }

    #[test]
    fn test_add_params_empty_is_noop() {
        let url = with_url(|qs| qs.add_params(ParameterSet::new(), Some("/x?b=2&a=1")));
        assert_eq!(url, "/x?b=2&a=1");

        let url = with_url(|qs| qs.add_params(Vec::<ParameterSet>::new(), Some("/x?b=2")));
        assert_eq!(url, "/x?b=2");
    }

    #[test]
    fn test_remove_params_exact_pair() {
        let url = with_url(|qs| qs.remove_params(&set(&[("a", "1")]), Some("/x?a=1&b=2")));
        assert_eq!(url, "/x?b=2");
    }

    #[test]
    fn test_remove_params_value_mismatch_keeps_key() {
        let url = with_url(|qs| qs.remove_params(&set(&[("a", "9")]), Some("/x?a=1&b=2")));
        assert_eq!(url, "/x?a=1&b=2");
    }

    #[test]
    fn test_remove_params_numeric_loose_match() {
        let url = with_url(|qs| qs.remove_params(&set(&[("page", "01")]), Some("/x?page=1&q=a")));
        assert_eq!(url, "/x?q=a");
    }

    #[test]
    fn test_remove_params_large_integers_compare_exactly() {
        let pairs = set(&[("id", "9007199254740993")]);
        let url = with_url(|qs| qs.remove_params(&pairs, Some("/x?id=9007199254740992&b=2")));
        assert_eq!(url, "/x?id=9007199254740992&b=2");

        let url = with_url(|qs| qs.remove_values("9007199254740993", Some("/x?id=9007199254740992")));
        assert_eq!(url, "/x?id=9007199254740992");
    }

    #[test]
    fn test_remove_params_same_value_other_key_untouched() {
        let url = with_url(|qs| qs.remove_params(&set(&[("a", "1")]), Some("/x?b=1&a=1")));
        assert_eq!(url, "/x?b=1");
    }

    #[test]
    fn test_remove_params_list_requires_whole_list() {
        let mut pairs = ParameterSet::new();
        pairs.insert("tag", ParameterValue::Many(vec!["a".to_string()]));

        let url = with_url(|qs| qs.remove_params(&pairs, Some("/x?tag[]=a&tag[]=b")));
        assert_eq!(url, "/x?tag%5B%5D=a&tag%5B%5D=b");

        let url = with_url(|qs| qs.remove_params(&pairs, Some("/x?tag[]=a")));
        assert_eq!(url, "/x?");
    }

    #[test]
    fn test_remove_keys_single() {
        let url = with_url(|qs| qs.remove_keys("a", Some("/x?a=1&b=2")));
        assert_eq!(url, "/x?b=2");
    }

    #[test]
    fn test_remove_keys_list_and_idempotent() {
        let once = with_url(|qs| qs.remove_keys(vec!["a", "c"], Some("/x?a=1&b=2&c=3")));
        assert_eq!(once, "/x?b=2");

        let twice = with_url(|qs| qs.remove_keys(vec!["a", "c"], Some(once.as_str())));
        assert_eq!(twice, once);
    }

    #[test]
    fn test_remove_values_removes_every_match() {
        let url = with_url(|qs| qs.remove_values("1", Some("/x?a=1&b=1&c=2")));
        assert_eq!(url, "/x?c=2");
    }

    #[test]
    fn test_remove_values_list() {
        let url = with_url(|qs| qs.remove_values(vec!["1", "2"], Some("/x?a=1&b=3&c=2")));
        assert_eq!(url, "/x?b=3");
    }

    #[test]
    fn test_remove_values_skips_list_entries() {
        let url = with_url(|qs| qs.remove_values("a", Some("/x?tag[]=a&k=a")));
        assert_eq!(url, "/x?tag%5B%5D=a");
    }

    #[test]
    fn test_replace_params_keeps_position() {
        let url = with_url(|qs| qs.replace_params(&set(&[("a", "9")]), Some("/x?a=1&b=2")));
        assert_eq!(url, "/x?a=9&b=2");
    }

    #[test]
    fn test_replace_params_inserts_missing() {
        let url = with_url(|qs| qs.replace_params(&set(&[("z", "1")]), Some("/x?a=1")));
        assert_eq!(url, "/x?a=1&z=1");
    }

    #[test]
    fn test_build_empty_params_keeps_question_mark() {
        let url = with_url(|qs| qs.build(&ParameterSet::new(), Some("/x?a=1")));
        assert_eq!(url, "/x?");
    }

    #[test]
    fn test_build_round_trip() {
        let mut params = ParameterSet::new();
        params.insert("q", "hello world");
        params.insert("tag", vec!["a".to_string(), "b".to_string()]);

        with_url(|qs| {
            let url = qs.build(&params, Some("/search"));
            assert_eq!(qs.extract_params(Some(url.as_str())), params);
        });
    }

    #[test]
    fn test_unmentioned_keys_keep_order() {
        let url = with_url(|qs| qs.remove_keys("b", Some("/x?d=4&b=2&a=1&c=3")));
        assert_eq!(url, "/x?d=4&a=1&c=3");
    }

    #[test]
    fn test_url_without_query_or_path() {
        let url = with_url(|qs| qs.add_params(set(&[("a", "1")]), Some("/plain/path")));
        assert_eq!(url, "/plain/path?a=1");

        let url = with_url(|qs| qs.add_params(set(&[("a", "1")]), Some("?b=2")));
        assert_eq!(url, "/?b=2&a=1");
    }

    #[test]
    fn test_absolute_url_keeps_only_path() {
        let url = with_url(|qs| qs.remove_keys("a", Some("https://example.com/docs?a=1&b=2")));
        assert_eq!(url, "/docs?b=2");
    }

    #[test]
    fn test_ambient_request_is_the_default() {
        let request = FixedRequest::new("/catalog?tag=rust&page=3");
        let qs = QueryTransformer::new(&request);

        assert_eq!(qs.add_params(set(&[("page", "4")]), None), "/catalog?tag=rust&page=4");
        assert_eq!(qs.remove_keys("page", None), "/catalog?tag=rust");
        assert_eq!(qs.remove_values("rust", None), "/catalog?page=3");
        assert_eq!(qs.remove_params(&set(&[("page", "3")]), None), "/catalog?tag=rust");
        assert_eq!(qs.replace_params(&set(&[("tag", "go")]), None), "/catalog?tag=go&page=3");
    }

    #[test]
    fn test_explicit_url_ignores_ambient_request() {
        let request = FixedRequest::new("/catalog?tag=rust");
        let qs = QueryTransformer::new(&request);
        assert_eq!(qs.remove_keys("a", Some("/other?a=1")), "/other?");
    }

    #[test]
    fn test_path_containing_scheme_is_kept_whole() {
        let url = with_url(|qs| qs.remove_keys("a", Some("/proxy/http://example.com/a?a=1&b=2")));
        assert_eq!(url, "/proxy/http://example.com/a?b=2");

        let request = FixedRequest::new("/share/https://example.com/post?x=1");
        let qs = QueryTransformer::new(&request);
        assert_eq!(qs.remove_keys("x", None), "/share/https://example.com/post?");
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let pairs = set(&[("a", "1")]);
        with_url(|qs| {
            qs.remove_params(&pairs, Some("/x?a=1"));
            qs.replace_params(&pairs, Some("/x?a=2"));
        });
        assert_eq!(pairs, set(&[("a", "1")]));
    }
}
