use std::fmt::Display;

use crate::domain::PaginationArgs;

/// Ordered list of wire parameters for one request.
///
/// Used as query string for `GET` and as form body for `POST`. The `push_*`
/// helpers encode the per-field mapping rules: optional values are omitted
/// when absent or empty, list values are either comma-joined or repeated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always send `key=value`.
    pub fn push(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.0.push((key.to_owned(), value.to_string()));
        self
    }

    /// Send `key=value` unless `value` is empty.
    pub fn push_str(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.push(key, value);
        }
        self
    }

    /// Send `key=value` when present and non-empty once formatted.
    pub fn push_opt<T: Display>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.is_empty() {
                self.0.push((key.to_owned(), value));
            }
        }
        self
    }

    /// Send `key=v1,v2,...` unless the list is empty.
    pub fn push_comma<S: AsRef<str>>(&mut self, key: &str, values: &[S]) -> &mut Self {
        if !values.is_empty() {
            let joined = values.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
            self.0.push((key.to_owned(), joined));
        }
        self
    }

    /// Send `key=v1&key=v2&...`.
    pub fn push_repeated<S: AsRef<str>>(&mut self, key: &str, values: &[S]) -> &mut Self {
        for value in values {
            self.0.push((key.to_owned(), value.as_ref().to_owned()));
        }
        self
    }

    /// Flatten paging arguments into `p` / `ps`, skipping zero values.
    pub fn push_pagination(&mut self, paging: &PaginationArgs) -> &mut Self {
        self.push_opt("p", paging.page.filter(|it| *it != 0));
        self.push_opt("ps", paging.page_size.filter(|it| *it != 0))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn optional_values_are_omitted_when_empty() {
        let mut params = Params::new();
        params
            .push_str("almSetting", "")
            .push_opt("q", None::<&str>)
            .push_opt("q", Some(""))
            .push_opt("ps", Some(50));
        assert_eq!(params.into_pairs(), pairs(&[("ps", "50")]));
    }

    #[test]
    fn list_values_are_comma_joined_or_repeated() {
        let tags = vec!["a".to_owned(), "b".to_owned()];
        let mut params = Params::new();
        params
            .push_comma("tags", &tags)
            .push_repeated("login", &tags)
            .push_comma("empty", &Vec::<String>::new());
        assert_eq!(
            params.into_pairs(),
            pairs(&[("tags", "a,b"), ("login", "a"), ("login", "b")])
        );
    }

    #[test]
    fn pagination_is_flattened_and_zero_skipped() {
        let mut params = Params::new();
        params.push("q", "x").push_pagination(&PaginationArgs {
            page: Some(0),
            page_size: Some(20),
        });
        assert_eq!(params.into_pairs(), pairs(&[("q", "x"), ("ps", "20")]));
    }

    #[test]
    fn booleans_use_display() {
        let mut params = Params::new();
        params.push_opt("resolved", Some(false));
        assert_eq!(params.get("resolved"), Some("false"));
    }
}
