// Parameter data model and the form codec

use indexmap::IndexMap;
use url::{form_urlencoded, ParseError, Url};

// Relative references are resolved against this to read their path
const RELATIVE_BASE: &str = "http://localhost/";

/// A decoded query value: a plain value or a bracketed list (`tag[]=a&tag[]=b`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    Single(String),
    Many(Vec<String>),
}

impl ParameterValue {
    /// Loose comparison: numeric strings compare by value, so "1" matches "01" and "1.0"
    pub fn loosely_eq(&self, other: &ParameterValue) -> bool {
        match (self, other) {
            (ParameterValue::Single(a), ParameterValue::Single(b)) => loosely_eq_str(a, b),
            (ParameterValue::Many(a), ParameterValue::Many(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loosely_eq_str(x, y))
            }
            _ => false,
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            ParameterValue::Single(value) => Some(value),
            ParameterValue::Many(_) => None,
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Single(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::Single(value)
    }
}

impl From<Vec<String>> for ParameterValue {
    fn from(values: Vec<String>) -> Self {
        ParameterValue::Many(values)
    }
}

/// Compare two strings the way form values are compared: exactly, or numerically
/// when both sides are numeric strings
pub(crate) fn loosely_eq_str(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (parse_numeric(a), parse_numeric(b)) {
        (Some(Numeric::Integer(x)), Some(Numeric::Integer(y))) => x == y,
        (Some(x), Some(y)) => x.as_f64() == y.as_f64(),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Numeric {
    Integer(i128),
    Float(f64),
}

impl Numeric {
    fn as_f64(self) -> f64 {
        match self {
            Numeric::Integer(value) => value as f64,
            Numeric::Float(value) => value,
        }
    }
}

fn parse_numeric(value: &str) -> Option<Numeric> {
    let trimmed = value.trim();
    let first = trimmed.chars().next()?;

    // f64::from_str also accepts "inf" and "NaN", which are not numeric query values
    if !(first.is_ascii_digit() || matches!(first, '+' | '-' | '.')) {
        return None;
    }
    if !trimmed
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }

    // Integers stay exact; f64 loses precision above 2^53
    if let Ok(integer) = trimmed.parse::<i128>() {
        return Some(Numeric::Integer(integer));
    }
    trimmed.parse().ok().map(Numeric::Float)
}

/// Ordered mapping of query keys to values. Iteration order is serialization order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: IndexMap<String, ParameterValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw query string (no leading `?`)
    pub fn parse(query: &str) -> Self {
        let mut set = Self::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key.is_empty() {
                continue;
            }

            match list_base(&key) {
                Some(base) => set.push(base, value.into_owned()),
                None => set.insert(key.into_owned(), value.into_owned()),
            }
        }

        set
    }

    /// Insert or overwrite. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParameterValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Append to the list under `key`, replacing a single value if one is present
    pub fn push(&mut self, key: &str, value: String) {
        match self.entries.get_mut(key) {
            Some(ParameterValue::Many(values)) => values.push(value),
            Some(existing) => *existing = ParameterValue::Many(vec![value]),
            None => {
                self.entries
                    .insert(key.to_string(), ParameterValue::Many(vec![value]));
            }
        }
    }

    /// Remove a key, keeping the relative order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<ParameterValue> {
        self.entries.shift_remove(key)
    }

    /// Shallow merge: keys in `other` overwrite, everything else is untouched
    pub fn merge(&mut self, other: ParameterSet) {
        self.entries.extend(other.entries);
    }

    /// Keep only the entries for which `keep` returns true
    pub fn filtered(self, mut keep: impl FnMut(&str, &ParameterValue) -> bool) -> Self {
        Self {
            entries: self
                .entries
                .into_iter()
                .filter(|(key, value)| keep(key.as_str(), value))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterValue)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Form-encode in insertion order. Lists use bracket notation.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        for (key, value) in &self.entries {
            match value {
                ParameterValue::Single(value) => {
                    serializer.append_pair(key, value);
                }
                ParameterValue::Many(values) => {
                    let list_key = format!("{}[]", key);
                    for value in values {
                        serializer.append_pair(&list_key, value);
                    }
                }
            }
        }

        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<ParameterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, ParameterValue);
    type IntoIter = indexmap::map::IntoIter<String, ParameterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// `tag[]` and `tag[3]` name the list `tag`. Anything else is a plain key.
fn list_base(key: &str) -> Option<&str> {
    let open = key.find('[')?;
    let index = key[open..].strip_prefix('[')?.strip_suffix(']')?;

    if open == 0 || !index.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    Some(&key[..open])
}

/// The two halves of a URL that matter for query transformation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    pub path: String,
    pub query: ParameterSet,
}

impl UrlParts {
    /// Split a relative or absolute URL. Never fails: missing pieces are empty.
    pub fn parse(url: &str) -> Self {
        let without_fragment = url.split('#').next().unwrap_or_default();
        let (location, query) = match without_fragment.split_once('?') {
            Some((location, query)) => (location, query),
            None => (without_fragment, ""),
        };

        Self {
            path: path_of(location).trim_start_matches('/').to_string(),
            query: ParameterSet::parse(query),
        }
    }

    /// Query parameters only. A URL without `?` yields an empty set.
    pub fn query_of(url: &str) -> ParameterSet {
        Self::parse(url).query
    }

    /// Path only, leading slashes stripped
    pub fn path_of(url: &str) -> String {
        Self::parse(url).path
    }
}

// Path component of the part of a URL before the query. Absolute and
// protocol-relative URLs lose their authority; relative paths are kept whole.
fn path_of(location: &str) -> String {
    let resolved = match Url::parse(location) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse(RELATIVE_BASE).and_then(|base| base.join(location))
        }
        Err(err) => Err(err),
    };

    match resolved {
        Ok(url) => url.path().to_string(),
        Err(err) => {
            tracing::debug!(location, error = %err, "unparseable URL, using it as the path");
            location.to_string()
        }
    }
}
