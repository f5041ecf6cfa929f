//! Ordered header multimap for responses under construction.
//!
//! Unlike [`http::HeaderMap`], [`HeaderList`] is an explicit sequence of
//! `(name, value)` pairs kept in insertion order. A name may appear any number
//! of times, which is what repeated headers such as `Set-Cookie` need, and the
//! encoder writes the pairs out exactly in the order they were appended.

use http::{HeaderName, HeaderValue};

/// An ordered sequence of header pairs, duplicates allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    entries: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a pair after all existing ones, keeping earlier values for the same name.
    pub fn append(&mut self, name: HeaderName, value: HeaderValue) {
        self.entries.push((name, value));
    }

    /// Removes every pair with this name and returns how many were removed.
    pub fn remove(&mut self, name: &HeaderName) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        before - self.entries.len()
    }

    /// Replaces all values for `name` with a single one, appended at the end.
    pub fn set(&mut self, name: HeaderName, value: HeaderValue) {
        self.remove(&name);
        self.append(name, value);
    }

    /// Returns the first value for `name`.
    pub fn get(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns all values for `name` in insertion order.
    pub fn get_all<'a>(&'a self, name: &HeaderName) -> impl Iterator<Item = &'a HeaderValue> + use<'a> {
        let name = name.clone();
        self.entries.iter().filter(move |(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &HeaderName) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.entries.iter().map(|(n, v)| (n, v))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a HeaderList {
    type Item = &'a (HeaderName, HeaderValue);
    type IntoIter = std::slice::Iter<'a, (HeaderName, HeaderValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{CONTENT_LENGTH, SET_COOKIE};

    fn value(s: &'static str) -> HeaderValue {
        HeaderValue::from_static(s)
    }

    #[test]
    fn append_keeps_every_value_in_order() {
        let mut headers = HeaderList::new();
        headers.append(SET_COOKIE, value("a=1"));
        headers.append(CONTENT_LENGTH, value("3"));
        headers.append(SET_COOKIE, value("b=2"));

        assert_eq!(headers.len(), 3);
        let cookies: Vec<_> = headers.get_all(&SET_COOKIE).collect();
        assert_eq!(cookies, vec![&value("a=1"), &value("b=2")]);
        assert_eq!(headers.get(&SET_COOKIE), Some(&value("a=1")));

        let names: Vec<_> = headers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["set-cookie", "content-length", "set-cookie"]);
    }

    #[test]
    fn remove_drops_all_values_for_name() {
        let mut headers = HeaderList::new();
        headers.append(SET_COOKIE, value("a=1"));
        headers.append(CONTENT_LENGTH, value("3"));
        headers.append(SET_COOKIE, value("b=2"));

        assert_eq!(headers.remove(&SET_COOKIE), 2);
        assert!(!headers.contains(&SET_COOKIE));
        assert!(headers.contains(&CONTENT_LENGTH));
        assert_eq!(headers.remove(&SET_COOKIE), 0);
    }

    #[test]
    fn set_replaces_existing_values() {
        let mut headers = HeaderList::new();
        headers.append(CONTENT_LENGTH, value("3"));
        headers.append(CONTENT_LENGTH, value("4"));
        headers.set(CONTENT_LENGTH, value("5"));

        let lengths: Vec<_> = headers.get_all(&CONTENT_LENGTH).collect();
        assert_eq!(lengths, vec![&value("5")]);
    }

    #[test]
    fn names_compare_case_insensitively() {
        let mut headers = HeaderList::new();
        headers.append(HeaderName::from_static("x-reason"), value("missing"));

        let upper = HeaderName::from_bytes(b"X-Reason").unwrap();
        assert_eq!(headers.get(&upper), Some(&value("missing")));
    }
}
