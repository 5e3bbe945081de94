//! Ordered store of query parameters.
//!
//! # Examples
//!
//! ```
//! use url_archive::QueryParams;
//!
//! let mut params = QueryParams::parse("foo=bar&baz");
//! params.set("foo", "foo bar");
//! params.set("qux", "1");
//! assert_eq!(params.to_query_string(), "foo=foo+bar&baz&qux=1");
//!
//! params.remove("baz");
//! assert_eq!(params.value("foo"), Some("foo bar"));
//! assert_eq!(params.to_query_string(), "foo=foo+bar&qux=1");
//! ```

use crate::pct_enc::{self, table};
use alloc::{string::String, vec::Vec};
use core::{ops::Index, slice};

/// A query parameter: a name with an optional value.
///
/// Names and values are stored unencoded. They are percent-encoded when the
/// parameter is serialized, with a space written as `+`, except that the value
/// of a *raw* parameter is written verbatim.
///
/// A parsed name or value whose octets do not decode to UTF-8 is kept in its
/// encoded form and written back verbatim. Such a value is reported as raw.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct QueryParam {
    pub(crate) name: String,
    pub(crate) value: Option<String>,
    pub(crate) raw: bool,
    pub(crate) raw_name: bool,
}

impl QueryParam {
    /// Creates a new parameter with the given name and value.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            raw: false,
            raw_name: false,
        }
    }

    /// Creates a new parameter whose value is written verbatim when serialized.
    ///
    /// The caller is responsible for escaping the value where needed.
    #[must_use]
    pub fn new_raw(name: &str, value: &str) -> Self {
        Self {
            raw: true,
            ..Self::new(name, value)
        }
    }

    /// Creates a new parameter that has a name only, serialized as `name` without `=`.
    #[must_use]
    pub fn flag(name: &str) -> Self {
        Self {
            name: name.into(),
            value: None,
            raw: false,
            raw_name: false,
        }
    }

    /// Returns the name of the parameter.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the parameter, or an empty string if it has none.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Checks whether the parameter has a value, i.e., is serialized with `=`.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Checks whether the value of the parameter is written verbatim when serialized.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Appends the serialized parameter onto the end of `buf`.
    pub fn write_to(&self, buf: &mut String) {
        if self.raw_name {
            buf.push_str(&self.name);
        } else {
            pct_enc::encode_form_to(&self.name, table::QUERY_DATA, buf);
        }
        if let Some(value) = &self.value {
            buf.push('=');
            if self.raw {
                buf.push_str(value);
            } else {
                pct_enc::encode_form_to(value, table::QUERY_DATA, buf);
            }
        }
    }
}

/// An ordered store of query parameters.
///
/// Parameters keep their insertion order. Setting the value of a
/// parameter that is already present updates it in place, and removing
/// a parameter keeps the relative order of the rest.
///
/// Names are matched exactly; no decoding is applied to lookup keys.
///
/// A name is normally present at most once. Parsing a query string keeps
/// repeated names as they appear, and [`append`] adds one explicitly.
///
/// [`append`]: Self::append
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams {
    entries: Vec<QueryParam>,
}

impl QueryParams {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parses a query string without the leading `'?'`.
    ///
    /// Pairs are separated by `'&'` and names from values by the first `'='`.
    /// Percent-encoded octets are decoded and `+` is decoded as a space.
    /// A name or value that does not decode to UTF-8 is kept as written.
    /// Empty pairs are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use url_archive::QueryParams;
    ///
    /// let params = QueryParams::parse("q=foo+bar&lang=%E6%B5%8B&&debug");
    /// assert_eq!(params.len(), 3);
    /// assert_eq!(params.value("q"), Some("foo bar"));
    /// assert_eq!(params.value("lang"), Some("测"));
    /// assert!(!params["debug"].has_value());
    ///
    /// let params = QueryParams::parse("q=caf%E9");
    /// assert_eq!(params.value("q"), Some("caf%E9"));
    /// assert_eq!(params.to_query_string(), "q=caf%E9");
    /// ```
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let entries = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = match pair.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (pair, None),
                };
                let (name, raw_name) = decode_part(name);
                let (value, raw) = match value.map(decode_part) {
                    Some((value, raw)) => (Some(value), raw),
                    None => (None, false),
                };
                QueryParam {
                    name,
                    value,
                    raw,
                    raw_name,
                }
            })
            .collect();
        Self { entries }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|p| p.name == name)
    }

    /// Inserts a parameter.
    ///
    /// If a parameter with the same name is present, it is replaced in place
    /// and any later duplicates are dropped. Otherwise the parameter is
    /// appended at the end.
    pub fn insert(&mut self, param: QueryParam) {
        match self.position(&param.name) {
            Some(i) => {
                let mut j = i + 1;
                while j < self.entries.len() {
                    if self.entries[j].name == param.name {
                        self.entries.remove(j);
                    } else {
                        j += 1;
                    }
                }
                self.entries[i] = param;
            }
            None => self.entries.push(param),
        }
    }

    /// Sets a parameter to the given value, see [`insert`](Self::insert).
    pub fn set(&mut self, name: &str, value: &str) {
        self.insert(QueryParam::new(name, value));
    }

    /// Sets a parameter to the given value, which is written verbatim when serialized.
    pub fn set_raw(&mut self, name: &str, value: &str) {
        self.insert(QueryParam::new_raw(name, value));
    }

    /// Appends a parameter at the end, even if its name is already present.
    pub fn append(&mut self, param: QueryParam) {
        self.entries.push(param);
    }

    /// Removes every parameter with the given name.
    ///
    /// Returns the first removed parameter. Nothing happens if the name is absent.
    pub fn remove(&mut self, name: &str) -> Option<QueryParam> {
        let i = self.position(name)?;
        let removed = self.entries.remove(i);
        self.entries.retain(|p| p.name != name);
        Some(removed)
    }

    /// Removes all parameters.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the first parameter with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&QueryParam> {
        self.entries.iter().find(|p| p.name == name)
    }

    /// Returns the value of the first parameter with the given name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(QueryParam::value)
    }

    /// Checks whether a parameter with the given name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the parameters in order.
    pub fn iter(&self) -> slice::Iter<'_, QueryParam> {
        self.entries.iter()
    }

    /// Appends the serialized parameters, joined by `'&'`, onto the end of `buf`.
    pub fn write_to(&self, buf: &mut String) {
        for (i, param) in self.entries.iter().enumerate() {
            if i > 0 {
                buf.push('&');
            }
            param.write_to(buf);
        }
    }

    /// Serializes the parameters into a query string without the leading `'?'`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut buf = String::new();
        self.write_to(&mut buf);
        buf
    }
}

// Decodes a name or value, or keeps it as written if it is not UTF-8.
fn decode_part(s: &str) -> (String, bool) {
    match pct_enc::decode_form_utf8(s) {
        Some(decoded) => (decoded.into_owned(), false),
        None => (s.into(), true),
    }
}

impl Index<&str> for QueryParams {
    type Output = QueryParam;

    /// Returns the first parameter with the given name.
    ///
    /// # Panics
    ///
    /// Panics if no parameter has the given name.
    fn index(&self, name: &str) -> &QueryParam {
        match self.get(name) {
            Some(param) => param,
            None => panic!("no query parameter named {name:?}"),
        }
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = &'a QueryParam;
    type IntoIter = slice::Iter<'a, QueryParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for QueryParams {
    type Item = QueryParam;
    type IntoIter = alloc::vec::IntoIter<QueryParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> Extend<(K, V)> for QueryParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k.as_ref(), v.as_ref());
        }
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{format, vec::Vec};

    // Reference model: a list of (name, value) with linear updates.
    #[derive(Default)]
    struct Model(Vec<(String, String)>);

    impl Model {
        fn set(&mut self, name: &str, value: &str) {
            match self.0.iter_mut().find(|(n, _)| n == name) {
                Some(entry) => entry.1 = value.into(),
                None => self.0.push((name.into(), value.into())),
            }
        }

        fn remove(&mut self, name: &str) {
            self.0.retain(|(n, _)| n != name);
        }
    }

    // xorshift32
    struct Rng(u32);

    impl Rng {
        fn next(&mut self) -> u32 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 17;
            self.0 ^= self.0 << 5;
            self.0
        }
    }

    #[test]
    fn matches_model() {
        const NAMES: [&str; 5] = ["a", "b", "c d", "e&f", "g"];

        for seed in 1..=64 {
            let mut rng = Rng(seed);
            let mut params = QueryParams::new();
            let mut model = Model::default();

            for step in 0..200 {
                let name = NAMES[(rng.next() % NAMES.len() as u32) as usize];
                if rng.next() % 3 == 0 {
                    params.remove(name);
                    model.remove(name);
                } else {
                    let value = format!("v{step}");
                    params.set(name, &value);
                    model.set(name, &value);
                }

                let actual: Vec<_> = params.iter().map(|p| (p.name(), p.value())).collect();
                let expected: Vec<_> = model.0.iter().map(|(n, v)| (&n[..], &v[..])).collect();
                assert_eq!(actual, expected, "seed {seed}, step {step}");
            }
        }
    }

    #[test]
    fn insert_collapses_duplicates() {
        let mut params = QueryParams::parse("a=1&b=2&a=3&c=4&a=5");
        assert_eq!(params.len(), 5);
        assert_eq!(params.value("a"), Some("1"));

        params.set("a", "x");
        assert_eq!(params.to_query_string(), "a=x&b=2&c=4");

        params.append(QueryParam::new("b", "y"));
        assert_eq!(params.to_query_string(), "a=x&b=2&c=4&b=y");
        assert_eq!(params.remove("b").map(|p| p.value), Some(Some("2".into())));
        assert_eq!(params.to_query_string(), "a=x&c=4");
    }

    #[test]
    fn serialize() {
        let mut params = QueryParams::new();
        params.set("foobar", "foo bar");
        assert_eq!(params.to_query_string(), "foobar=foo+bar");
        params.set_raw("foobar", "foo bar");
        assert_eq!(params.to_query_string(), "foobar=foo bar");

        params.set("k&=", "1+1=2");
        assert_eq!(params.to_query_string(), "foobar=foo bar&k%26%3D=1%2B1%3D2");

        let params = QueryParams::parse("y/./x");
        assert_eq!(params.to_query_string(), "y/./x");

        let mut params = QueryParams::new();
        params.set("q?", "what?");
        assert_eq!(params.to_query_string(), "q%3F=what%3F");
    }

    #[test]
    fn non_utf8_kept_as_written() {
        let query = "q=caf%E9&%FF=1&lang=%C3%A9&x=a+%e9";
        let params = QueryParams::parse(query);
        assert_eq!(params.to_query_string(), query);

        assert_eq!(params.value("q"), Some("caf%E9"));
        assert!(params["q"].is_raw());
        assert_eq!(params.value("%FF"), Some("1"));
        assert!(!params["%FF"].is_raw());
        assert_eq!(params.value("lang"), Some("\u{e9}"));
        assert!(!params["lang"].is_raw());
        assert_eq!(params.value("x"), Some("a+%e9"));

        assert_eq!(QueryParams::parse(&params.to_query_string()), params);
    }
}
